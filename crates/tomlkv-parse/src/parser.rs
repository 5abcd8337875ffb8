//! Grammar parser for TOML documents.
//!
//! Walks the token stream production by production and pushes one event per
//! production into a [`ParseCallback`]. There is no error recovery: the
//! first syntax error is delivered as [`Event::Error`] and the parse stops.

#[allow(unused_imports)]
use crate::trace;
use crate::{is_bare_string, Event, Lexer, ParseCallback, Scalar, ScalarKind, Token, TokenKind};

/// Why event delivery stopped early.
enum Stop {
    /// The callback returned `false`.
    Callback,
    /// A syntax error was delivered.
    Error,
}

type Step = Result<(), Stop>;

/// Wraps the lexer with a single pending slot for stashing boundary tokens.
struct TokenSource<'src> {
    lexer: Lexer<'src>,
    /// Single pending token slot. When a production looks one token past its
    /// end, it stashes the token here instead of discarding it. Limited to
    /// exactly one slot - if we ever need more, that's a bug in our logic.
    pending: Option<Token<'src>>,
}

impl<'src> TokenSource<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            pending: None,
        }
    }

    fn next(&mut self) -> Token<'src> {
        self.pending
            .take()
            .unwrap_or_else(|| self.lexer.next_token())
    }

    fn stash(&mut self, token: Token<'src>) {
        debug_assert!(self.pending.is_none(), "double stash - this is a bug");
        self.pending = Some(token);
    }
}

/// Push-based grammar parser for TOML.
pub struct Parser<'src> {
    source: TokenSource<'src>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source: TokenSource::new(source),
        }
    }

    /// Parse the document, delivering events to `sink`.
    pub fn parse<C: ParseCallback>(mut self, sink: &mut C) {
        let _ = self.document(sink);
    }

    fn emit<C: ParseCallback>(&mut self, sink: &mut C, event: Event) -> Step {
        trace!("event {:?}", event);
        if sink.event(event) {
            Ok(())
        } else {
            Err(Stop::Callback)
        }
    }

    fn syntax_error<C: ParseCallback>(
        &mut self,
        sink: &mut C,
        token: &Token<'src>,
        expecting: &str,
    ) -> Step {
        let message = format!(
            "syntax error, unexpected {}, expecting {}",
            describe(token),
            expecting
        );
        self.emit(
            sink,
            Event::Error {
                line: token.loc.first_line,
                loc: token.loc,
                message,
            },
        )?;
        Err(Stop::Error)
    }

    /// Top level: keypairs, table headers, comments and blank lines.
    fn document<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        loop {
            let token = self.source.next();
            match token.kind {
                TokenKind::Eof => return self.emit(sink, Event::DocumentEnd),
                TokenKind::Newline => self.emit(sink, Event::Newline)?,
                TokenKind::Comment => {
                    self.emit(sink, Event::Comment(comment_scalar(&token)))?;
                    self.structural_newline();
                }
                TokenKind::DoubleLBracket => self.table_array(sink)?,
                TokenKind::LBracket => self.simple_table(sink)?,
                TokenKind::Scalar(_) => self.keypair(sink, token)?,
                _ => return self.syntax_error(sink, &token, "a key or a table header"),
            }
        }
    }

    /// Consume the newline ending the current line; it carries no
    /// round-trip information of its own.
    fn structural_newline(&mut self) {
        let token = self.source.next();
        if token.kind != TokenKind::Newline {
            self.source.stash(token);
        }
    }

    /// `key = value` plus the optional trailing comment.
    fn keypair<C: ParseCallback>(&mut self, sink: &mut C, first: Token<'src>) -> Step {
        self.key(sink, first)?;
        let token = self.source.next();
        if token.kind != TokenKind::Equal {
            return self.syntax_error(sink, &token, "'='");
        }
        self.value(sink)?;
        self.emit(sink, Event::KeyPairEnd)?;
        self.line_end(sink, Event::KeyPairCommentEnd)
    }

    /// A dotted key: one or more simple keys separated by dots.
    fn key<C: ParseCallback>(&mut self, sink: &mut C, first: Token<'src>) -> Step {
        self.emit(sink, Event::KeyStart)?;
        self.simple_key(sink, first)?;
        loop {
            let token = self.source.next();
            if token.kind != TokenKind::Dot {
                self.source.stash(token);
                break;
            }
            let token = self.source.next();
            if !token.kind.is_scalar() {
                return self.syntax_error(sink, &token, "a key");
            }
            self.simple_key(sink, token)?;
        }
        self.emit(sink, Event::KeyEnd)
    }

    /// One dotted-key segment.
    ///
    /// A float token in key position is really a dotted pair of bare keys
    /// that the lexer's longest-match rule glued together (`1.2`). Split it
    /// here when it has the plain dotted-decimal shape; anything with an
    /// exponent or sign is left for the driver to reject.
    fn simple_key<C: ParseCallback>(&mut self, sink: &mut C, token: Token<'src>) -> Step {
        let kind = match token.kind {
            TokenKind::Scalar(kind) => kind,
            _ => return self.syntax_error(sink, &token, "a key"),
        };
        let scalar = Scalar::from_token(&token, kind);
        if kind == ScalarKind::FloatNum {
            if let Some((first, second)) = split_dotted_float(&scalar) {
                self.emit(sink, Event::SimpleKey(first))?;
                return self.emit(sink, Event::SimpleKey(second));
            }
        }
        self.emit(sink, Event::SimpleKey(scalar))
    }

    /// A value: scalar, array, or inline table.
    fn value<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        let token = self.source.next();
        match token.kind {
            TokenKind::Scalar(kind) => {
                let scalar = Scalar::from_token(&token, kind);
                self.emit(sink, Event::Value(scalar))
            }
            TokenKind::LBracket => self.array(sink),
            TokenKind::LBrace => self.inline_table(sink),
            _ => self.syntax_error(sink, &token, "a value"),
        }
    }

    /// An array value; the opening `[` is already consumed.
    fn array<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        self.array_trivia(sink)?;
        let token = self.source.next();
        if token.kind == TokenKind::RBracket {
            return self.emit(sink, Event::ArrayEmpty);
        }
        self.source.stash(token);

        self.emit(sink, Event::ArrayStart)?;
        loop {
            self.emit(sink, Event::ArrayElementStart)?;
            self.value(sink)?;
            self.emit(sink, Event::ArrayElementEnd)?;
            self.array_trivia(sink)?;
            let token = self.source.next();
            match token.kind {
                TokenKind::Comma => {
                    self.array_trivia(sink)?;
                    let token = self.source.next();
                    if token.kind == TokenKind::RBracket {
                        break;
                    }
                    self.source.stash(token);
                }
                TokenKind::RBracket => break,
                _ => return self.syntax_error(sink, &token, "',' or ']'"),
            }
        }
        self.emit(sink, Event::ArrayEnd)
    }

    /// Newlines and comments inside array brackets; both carry round-trip
    /// information for the surrounding elements.
    fn array_trivia<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        loop {
            let token = self.source.next();
            match token.kind {
                TokenKind::Newline => self.emit(sink, Event::Newline)?,
                TokenKind::Comment => self.emit(sink, Event::Comment(comment_scalar(&token)))?,
                _ => {
                    self.source.stash(token);
                    return Ok(());
                }
            }
        }
    }

    /// An inline table value; the opening `{` is already consumed.
    fn inline_table<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        let token = self.source.next();
        if token.kind == TokenKind::RBrace {
            return self.emit(sink, Event::InlineTableEmpty);
        }
        self.emit(sink, Event::InlineTableStart)?;
        self.source.stash(token);
        loop {
            let token = self.source.next();
            if !token.kind.is_scalar() {
                return self.syntax_error(sink, &token, "a key");
            }
            self.key(sink, token)?;
            let token = self.source.next();
            if token.kind != TokenKind::Equal {
                return self.syntax_error(sink, &token, "'='");
            }
            self.value(sink)?;
            self.emit(sink, Event::KeyPairEnd)?;
            let token = self.source.next();
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrace => break,
                _ => return self.syntax_error(sink, &token, "',' or '}'"),
            }
        }
        self.emit(sink, Event::InlineTableEnd)
    }

    /// A `[name]` header line; the `[` is already consumed.
    fn simple_table<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        self.emit(sink, Event::SimpleTableStart)?;
        let token = self.source.next();
        if !token.kind.is_scalar() {
            return self.syntax_error(sink, &token, "a key");
        }
        self.key(sink, token)?;
        let token = self.source.next();
        if token.kind != TokenKind::RBracket {
            return self.syntax_error(sink, &token, "']'");
        }
        self.emit(sink, Event::SimpleTableEnd)?;
        self.line_end(sink, Event::TableCommentEnd)
    }

    /// A `[[name]]` header line; the `[[` is already consumed.
    fn table_array<C: ParseCallback>(&mut self, sink: &mut C) -> Step {
        self.emit(sink, Event::TableArrayStart)?;
        let token = self.source.next();
        if !token.kind.is_scalar() {
            return self.syntax_error(sink, &token, "a key");
        }
        self.key(sink, token)?;
        let token = self.source.next();
        if token.kind != TokenKind::DoubleRBracket {
            return self.syntax_error(sink, &token, "']]'");
        }
        self.emit(sink, Event::TableArrayEnd)?;
        self.line_end(sink, Event::TableCommentEnd)
    }

    /// Optional trailing comment, the end-of-line marker event, and the
    /// structural newline.
    fn line_end<C: ParseCallback>(&mut self, sink: &mut C, end_event: Event) -> Step {
        let mut token = self.source.next();
        if token.kind == TokenKind::Comment {
            self.emit(sink, Event::Comment(comment_scalar(&token)))?;
            token = self.source.next();
        }
        match token.kind {
            TokenKind::Newline => self.emit(sink, end_event),
            TokenKind::Eof => {
                self.source.stash(token);
                self.emit(sink, end_event)
            }
            _ => self.syntax_error(sink, &token, "a newline"),
        }
    }
}

/// Human-readable token description for error messages.
fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Error => format!("invalid input '{}'", token.text),
        _ => format!("'{}'", token.text),
    }
}

/// Make a scalar out of a comment token; text is everything after the `#`.
fn comment_scalar(token: &Token<'_>) -> Scalar {
    Scalar {
        kind: ScalarKind::StringBare,
        text: token.text[1..].to_string(),
        line: token.loc.first_line,
        loc: token.loc,
    }
}

/// Split a float lexeme used as a key into its two bare segments, or `None`
/// if it is not a plain dotted decimal.
fn split_dotted_float(scalar: &Scalar) -> Option<(Scalar, Scalar)> {
    let text = &scalar.text;
    if text.bytes().any(|b| matches!(b, b'e' | b'E' | b'+' | b'-')) {
        return None;
    }
    let (first, second) = text.split_once('.')?;
    if second.contains('.') || !is_bare_string(first) || !is_bare_string(second) {
        return None;
    }
    Some((
        Scalar::bare(first, scalar.line, scalar.loc),
        Scalar::bare(second, scalar.line, scalar.loc),
    ))
}

#[cfg(test)]
mod tests;
