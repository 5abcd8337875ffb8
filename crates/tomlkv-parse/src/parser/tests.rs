use super::*;
use crate::{Event, ScalarKind};

fn parse(source: &str) -> Vec<Event> {
    let mut events = Vec::new();
    Parser::new(source).parse(&mut events);
    events
}

fn keys(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::SimpleKey(s) => Some(s.text.as_str()),
            _ => None,
        })
        .collect()
}

fn values(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Value(s) => Some(s.text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_empty_document() {
    let events = parse("");
    assert_eq!(events, vec![Event::DocumentEnd]);
}

#[test]
fn test_simple_keypair() {
    let events = parse("a = 1\n");
    assert_eq!(keys(&events), vec!["a"]);
    assert_eq!(values(&events), vec!["1"]);
    assert!(events.contains(&Event::KeyPairEnd));
    assert!(events.contains(&Event::KeyPairCommentEnd));
    assert!(events.contains(&Event::DocumentEnd));
}

#[test]
fn test_keypair_without_trailing_newline() {
    let events = parse("a = 1");
    assert!(events.contains(&Event::KeyPairCommentEnd));
    assert!(events.contains(&Event::DocumentEnd));
}

#[test]
fn test_dotted_key() {
    let events = parse("a.b.c = 1\n");
    assert_eq!(keys(&events), vec!["a", "b", "c"]);
}

#[test]
fn test_quoted_key_keeps_dot() {
    let events = parse("\"k.x\" = \"v\"\n");
    assert_eq!(keys(&events), vec!["k.x"]);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SimpleKey(s) if s.kind == ScalarKind::StringBasic
    )));
}

#[test]
fn test_float_key_splits_into_two_segments() {
    let events = parse("1.2 = 1\n");
    assert_eq!(keys(&events), vec!["1", "2"]);
    assert!(events.iter().all(|e| !matches!(
        e,
        Event::SimpleKey(s) if s.kind == ScalarKind::FloatNum
    )));
}

#[test]
fn test_float_key_with_exponent_is_not_split() {
    let events = parse("1.2e3 = 1\n");
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SimpleKey(s) if s.kind == ScalarKind::FloatNum && s.text == "1.2e3"
    )));
}

#[test]
fn test_structural_newline_not_reported() {
    let events = parse("a = 1\nb = 2\n");
    let newlines = events.iter().filter(|e| **e == Event::Newline).count();
    assert_eq!(newlines, 0);
}

#[test]
fn test_blank_line_reported() {
    let events = parse("a = 1\n\nb = 2\n");
    let newlines = events.iter().filter(|e| **e == Event::Newline).count();
    assert_eq!(newlines, 1);
}

#[test]
fn test_simple_table_events() {
    let events = parse("[t]\nk = true\n");
    let positions: Vec<usize> = [
        events
            .iter()
            .position(|e| *e == Event::SimpleTableStart)
            .unwrap(),
        events
            .iter()
            .position(|e| *e == Event::SimpleTableEnd)
            .unwrap(),
        events
            .iter()
            .position(|e| *e == Event::TableCommentEnd)
            .unwrap(),
    ]
    .to_vec();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(keys(&events), vec!["t", "k"]);
}

#[test]
fn test_table_array_events() {
    let events = parse("[[a]]\nk = 1\n");
    assert!(events.contains(&Event::TableArrayStart));
    assert!(events.contains(&Event::TableArrayEnd));
    assert_eq!(keys(&events), vec!["a", "k"]);
}

#[test]
fn test_array_events() {
    let events = parse("a = [1, 2]\n");
    let starts = events
        .iter()
        .filter(|e| **e == Event::ArrayElementStart)
        .count();
    let ends = events
        .iter()
        .filter(|e| **e == Event::ArrayElementEnd)
        .count();
    assert_eq!(starts, 2);
    assert_eq!(ends, 2);
    assert_eq!(values(&events), vec!["1", "2"]);
    assert!(events.contains(&Event::ArrayStart));
    assert!(events.contains(&Event::ArrayEnd));
}

#[test]
fn test_empty_array() {
    let events = parse("a = []\n");
    assert!(events.contains(&Event::ArrayEmpty));
    assert!(!events.contains(&Event::ArrayStart));
}

#[test]
fn test_array_trailing_comma() {
    let events = parse("a = [1, 2,]\n");
    let starts = events
        .iter()
        .filter(|e| **e == Event::ArrayElementStart)
        .count();
    assert_eq!(starts, 2);
    assert!(events.contains(&Event::ArrayEnd));
}

#[test]
fn test_multiline_array_reports_newlines() {
    let events = parse("a = [\n1,\n2\n]\n");
    let newlines = events.iter().filter(|e| **e == Event::Newline).count();
    assert_eq!(newlines, 3);
}

#[test]
fn test_nested_arrays() {
    let events = parse("a = [[1], [2]]\n");
    let starts = events.iter().filter(|e| **e == Event::ArrayStart).count();
    assert_eq!(starts, 3);
    assert!(!events.contains(&Event::TableArrayStart));
}

#[test]
fn test_inline_table_events() {
    let events = parse("t = { a = 1, b = 2 }\n");
    assert!(events.contains(&Event::InlineTableStart));
    assert!(events.contains(&Event::InlineTableEnd));
    assert_eq!(keys(&events), vec!["t", "a", "b"]);
    // Inline keypairs end their pair but not a line.
    let pair_ends = events.iter().filter(|e| **e == Event::KeyPairEnd).count();
    let line_ends = events
        .iter()
        .filter(|e| **e == Event::KeyPairCommentEnd)
        .count();
    assert_eq!(pair_ends, 3);
    assert_eq!(line_ends, 1);
}

#[test]
fn test_empty_inline_table() {
    let events = parse("t = {}\n");
    assert!(events.contains(&Event::InlineTableEmpty));
    assert!(!events.contains(&Event::InlineTableStart));
}

#[test]
fn test_comment_events() {
    let events = parse("# hello\nk = 1 # inline\n");
    let comments: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            Event::Comment(s) => Some(s.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(comments, vec![" hello", " inline"]);
    // The inline comment arrives before the line-end marker.
    let comment_pos = events
        .iter()
        .position(|e| matches!(e, Event::Comment(s) if s.text == " inline"))
        .unwrap();
    let end_pos = events
        .iter()
        .position(|e| *e == Event::KeyPairCommentEnd)
        .unwrap();
    assert!(comment_pos < end_pos);
}

#[test]
fn test_syntax_error_stops_parse() {
    let events = parse("a = = 1\nb = 2\n");
    assert!(matches!(events.last(), Some(Event::Error { .. })));
    assert_eq!(keys(&events), vec!["a"]);
}

#[test]
fn test_error_reports_line() {
    let events = parse("a = 1\nb =\n");
    match events.last() {
        Some(Event::Error { line, message, .. }) => {
            assert_eq!(*line, 2);
            assert!(message.contains("syntax error"), "message: {message}");
        }
        other => panic!("expected error event, got {other:?}"),
    }
}

#[test]
fn test_missing_equals() {
    let events = parse("a 1\n");
    assert!(matches!(events.last(), Some(Event::Error { .. })));
}

#[test]
fn test_value_kinds() {
    let events = parse("a = 1979-05-27T07:32:00Z\n");
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Value(s) if s.kind == ScalarKind::OffsetDatetime
    )));
    let events = parse("a = 'literal'\n");
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Value(s) if s.kind == ScalarKind::StringLiteral && s.text == "literal"
    )));
}

#[test]
fn test_callback_can_stop_parse() {
    struct StopAfterFirst(usize);
    impl ParseCallback for StopAfterFirst {
        fn event(&mut self, _event: Event) -> bool {
            self.0 += 1;
            self.0 < 2
        }
    }
    let mut sink = StopAfterFirst(0);
    Parser::new("a = 1\nb = 2\n").parse(&mut sink);
    assert_eq!(sink.0, 2);
}
