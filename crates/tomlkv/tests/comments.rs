//! Comment and blank-line attachment.

use tomlkv::{key_handle, read_str, Key, KeyName, KeySet, ReadError};

fn read_doc(source: &str) -> (KeySet, Result<(), ReadError>) {
    let root = key_handle(Key::new(KeyName::new("/")));
    let mut keys = KeySet::new();
    let result = read_str(source, &mut keys, &root);
    (keys, result)
}

fn meta(keys: &KeySet, name: &str, meta_name: &str) -> Option<String> {
    keys.lookup_name(name)
        .unwrap_or_else(|| panic!("missing key {name}"))
        .borrow()
        .meta(meta_name)
        .map(str::to_string)
}

#[test]
fn preceding_and_inline_comments() {
    let (keys, result) = read_doc("# hello\nk = 1 # inline\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/k", "comment/#0").as_deref(), Some(" hello"));
    assert_eq!(meta(&keys, "/k", "comment/#0/start").as_deref(), Some("#"));
    assert_eq!(meta(&keys, "/k", "inline/comment").as_deref(), Some(" inline"));
}

#[test]
fn multiple_preceding_comments_keep_order() {
    let (keys, result) = read_doc("# one\n# two\nk = 1\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/k", "comment/#0").as_deref(), Some(" one"));
    assert_eq!(meta(&keys, "/k", "comment/#1").as_deref(), Some(" two"));
}

#[test]
fn blank_lines_are_recorded() {
    let (keys, result) = read_doc("a = 1\n\n\nb = 2\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/b", "comment/#0").as_deref(), Some(""));
    assert_eq!(meta(&keys, "/b", "comment/#0/blanks").as_deref(), Some("2"));
    assert_eq!(meta(&keys, "/b", "comment/#0/start"), None);
}

#[test]
fn blank_lines_before_a_comment() {
    let (keys, result) = read_doc("a = 1\n\n# note\nb = 2\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/b", "comment/#0").as_deref(), Some(" note"));
    assert_eq!(meta(&keys, "/b", "comment/#0/blanks").as_deref(), Some("1"));
}

#[test]
fn table_header_comments() {
    let (keys, result) = read_doc("# above\n[t] # beside\nk = 1\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/t", "comment/#0").as_deref(), Some(" above"));
    assert_eq!(meta(&keys, "/t", "inline/comment").as_deref(), Some(" beside"));
}

#[test]
fn table_array_header_comments_go_to_the_element() {
    let (keys, result) = read_doc("# pre\n[[a]]\nk = 1\n");
    result.unwrap();
    // The unindexed descriptor stays clean; the indexed element key holds
    // the comments and is emitted because of them.
    assert_eq!(meta(&keys, "/a", "comment/#0"), None);
    assert_eq!(meta(&keys, "/a/#0", "comment/#0").as_deref(), Some(" pre"));
}

#[test]
fn empty_table_array_with_inline_comment_is_emitted() {
    let (keys, result) = read_doc("[[a]] # side\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/a/#0", "inline/comment").as_deref(), Some(" side"));
}

#[test]
fn comment_between_array_elements_becomes_inline_of_previous() {
    let (keys, result) = read_doc("a = [ 1, # one\n2 ]\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/a/#0", "inline/comment").as_deref(), Some(" one"));
}

#[test]
fn first_trailing_array_comment_becomes_inline_of_last_element() {
    let (keys, result) = read_doc("a = [ 1 # last\n]\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/a/#0", "inline/comment").as_deref(), Some(" last"));
}

#[test]
fn remaining_trailing_array_comments_are_dropped() {
    let (keys, result) = read_doc("a = [ 1 # kept\n# dropped\n]\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/a/#0", "inline/comment").as_deref(), Some(" kept"));
    for key in keys.iter() {
        let key = key.borrow();
        for (name, value) in key.meta_iter() {
            assert!(
                !value.contains("dropped"),
                "comment leaked into {name} of {}",
                key.name()
            );
        }
    }
}

#[test]
fn comment_only_document_synthesizes_one_key() {
    let (keys, result) = read_doc("# lonely\n\n# comments\n");
    result.unwrap();
    assert_eq!(keys.len(), 1);
    let root = keys.lookup_name("/").unwrap();
    assert_eq!(root.borrow().meta("comment/#0"), Some(" lonely"));
    assert_eq!(root.borrow().meta("comment/#1"), Some(" comments"));
    assert_eq!(root.borrow().meta("comment/#1/blanks"), Some("1"));
}

#[test]
fn blank_only_document_emits_nothing() {
    let (keys, result) = read_doc("\n\n\n");
    result.unwrap();
    assert!(keys.is_empty());
}

#[test]
fn comments_attach_to_table_not_the_previous_key() {
    let (keys, result) = read_doc("a = 1\n# for table\n[t]\nk = 2\n");
    result.unwrap();
    assert_eq!(meta(&keys, "/t", "comment/#0").as_deref(), Some(" for table"));
    assert_eq!(meta(&keys, "/a", "comment/#0"), None);
}
