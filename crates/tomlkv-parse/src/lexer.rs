//! Lexer for TOML documents.
//!
//! Bare words are classified context-free by pattern the way a generated
//! lexer ranks its rules: the longest match wins and ties go to the more
//! specific pattern (datetime over boolean over float over integer over bare
//! string). That ranking is why `1.2` lexes as a float even in key position;
//! the parser resolves that case.

#[allow(unused_imports)]
use crate::trace;
use crate::{Location, ScalarKind, Span, Token, TokenKind};

/// A lexer that produces tokens from TOML source text.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Current line (1-based).
    line: u32,
    /// Current column (1-based, counted in characters).
    column: u32,

    /// Whether only whitespace has been seen since the last newline.
    at_line_start: bool,
    /// Open `[` value brackets; `[[` never starts a header inside a value.
    array_depth: u32,
    /// Whether a `[[` header is open, so `]]` lexes as one token.
    in_table_header: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            array_depth: 0,
            in_table_header: false,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advance over `n` bytes of ASCII text (no newlines).
    #[inline]
    fn advance_ascii(&mut self, n: usize) {
        self.pos += n as u32;
        self.column += n as u32;
        self.remaining = &self.remaining[n..];
    }

    /// Create a token reaching from the recorded start to the current
    /// position.
    fn token(&self, kind: TokenKind, start: u32, line: u32, column: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        let loc = Location {
            span,
            first_line: line,
            first_column: column,
            last_line: self.line,
            last_column: self.column,
        };
        trace!("token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, loc, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        // Horizontal whitespace is never meaningful on its own.
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }

        let start = self.pos;
        let (line, column) = (self.line, self.column);

        let c = match self.peek() {
            None => return self.token(TokenKind::Eof, start, line, column),
            Some(c) => c,
        };

        let was_line_start = self.at_line_start;
        self.at_line_start = false;

        match c {
            '\n' => {
                self.advance();
                self.at_line_start = true;
                self.token(TokenKind::Newline, start, line, column)
            }
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                self.at_line_start = true;
                self.token(TokenKind::Newline, start, line, column)
            }
            '#' => self.lex_comment(start, line, column),
            '=' => {
                self.advance();
                self.token(TokenKind::Equal, start, line, column)
            }
            '.' => {
                self.advance();
                self.token(TokenKind::Dot, start, line, column)
            }
            ',' => {
                self.advance();
                self.token(TokenKind::Comma, start, line, column)
            }
            '{' => {
                self.advance();
                self.token(TokenKind::LBrace, start, line, column)
            }
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start, line, column)
            }
            '[' => {
                self.advance();
                if was_line_start && self.array_depth == 0 && self.peek() == Some('[') {
                    self.advance();
                    self.in_table_header = true;
                    self.token(TokenKind::DoubleLBracket, start, line, column)
                } else {
                    // A `[` in value position opens an array; a `[name]`
                    // header bracket does not.
                    let header_bracket = was_line_start && self.array_depth == 0;
                    if !header_bracket {
                        self.array_depth += 1;
                    }
                    self.token(TokenKind::LBracket, start, line, column)
                }
            }
            ']' => {
                self.advance();
                if self.in_table_header && self.peek() == Some(']') {
                    self.advance();
                    self.in_table_header = false;
                    self.token(TokenKind::DoubleRBracket, start, line, column)
                } else {
                    self.array_depth = self.array_depth.saturating_sub(1);
                    self.token(TokenKind::RBracket, start, line, column)
                }
            }
            '"' => {
                if self.remaining.starts_with("\"\"\"") {
                    self.lex_ml_string(start, line, column, '"', ScalarKind::StringMlBasic)
                } else {
                    self.lex_basic_string(start, line, column)
                }
            }
            '\'' => {
                if self.remaining.starts_with("'''") {
                    self.lex_ml_string(start, line, column, '\'', ScalarKind::StringMlLiteral)
                } else {
                    self.lex_literal_string(start, line, column)
                }
            }
            _ => self.lex_word(start, line, column),
        }
    }

    /// Lex a comment: `#` to end of line. The token text keeps the `#`.
    fn lex_comment(&mut self, start: u32, line: u32, column: u32) -> Token<'src> {
        self.advance();
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '\r' && self.peek_nth(1) == Some('\n')) {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::Comment, start, line, column)
    }

    /// Lex a single-line basic string: `"..."` with escapes.
    fn lex_basic_string(&mut self, start: u32, line: u32, column: u32) -> Token<'src> {
        self.advance();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.token(TokenKind::Error, start, line, column);
                }
                Some('"') => {
                    self.advance();
                    return self.token(
                        TokenKind::Scalar(ScalarKind::StringBasic),
                        start,
                        line,
                        column,
                    );
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lex a single-line literal string: `'...'`.
    fn lex_literal_string(&mut self, start: u32, line: u32, column: u32) -> Token<'src> {
        self.advance();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.token(TokenKind::Error, start, line, column);
                }
                Some('\'') => {
                    self.advance();
                    return self.token(
                        TokenKind::Scalar(ScalarKind::StringLiteral),
                        start,
                        line,
                        column,
                    );
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lex a multiline string delimited by three quotes. Runs of four or
    /// five quotes leave the extra quotes as content before the closing
    /// delimiter.
    fn lex_ml_string(
        &mut self,
        start: u32,
        line: u32,
        column: u32,
        quote: char,
        kind: ScalarKind,
    ) -> Token<'src> {
        self.advance();
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => return self.token(TokenKind::Error, start, line, column),
                Some('\\') if quote == '"' => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    let mut run = 1;
                    while self.peek_nth(run) == Some(quote) {
                        run += 1;
                    }
                    for _ in 0..run {
                        self.advance();
                    }
                    if run >= 3 {
                        return self.token(TokenKind::Scalar(kind), start, line, column);
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lex a bare word: longest match over the literal patterns, ties broken
    /// by pattern rank.
    fn lex_word(&mut self, start: u32, line: u32, column: u32) -> Token<'src> {
        let rem = self.remaining;

        let mut best: Option<(usize, ScalarKind)> = None;
        let mut consider = |len: usize, kind: ScalarKind| {
            if len > 0 && best.map_or(true, |(b, _)| len > b) {
                best = Some((len, kind));
            }
        };

        if let Some((len, kind)) = match_datetime(rem) {
            consider(len, kind);
        }
        if let Some(len) = match_boolean(rem) {
            consider(len, ScalarKind::Boolean);
        }
        if let Some((len, kind)) = match_float(rem) {
            consider(len, kind);
        }
        if let Some((len, kind)) = match_integer(rem) {
            consider(len, kind);
        }
        if let Some(len) = match_bare(rem) {
            consider(len, ScalarKind::StringBare);
        }

        match best {
            Some((len, kind)) => {
                self.advance_ascii(len);
                self.token(TokenKind::Scalar(kind), start, line, column)
            }
            None => {
                self.advance();
                self.token(TokenKind::Error, start, line, column)
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

// ============================================================================
// Word classification
// ============================================================================

fn is_digit(b: Option<&u8>) -> bool {
    matches!(b, Some(c) if c.is_ascii_digit())
}

/// Length of a digit run allowing `_` separators after the first digit.
fn digit_run(b: &[u8]) -> usize {
    if !is_digit(b.first()) {
        return 0;
    }
    b.iter()
        .take_while(|c| c.is_ascii_digit() || **c == b'_')
        .count()
}

/// Exactly `n` consecutive digits.
fn fixed_digits(b: &[u8], n: usize) -> bool {
    b.len() >= n && b[..n].iter().all(u8::is_ascii_digit)
}

/// Match `HH:MM:SS` with an optional fraction; returns the length.
fn match_partial_time(b: &[u8]) -> Option<usize> {
    if !(fixed_digits(b, 2) && b.get(2) == Some(&b':') && fixed_digits(&b[3..], 2)) {
        return None;
    }
    if !(b.get(5) == Some(&b':') && fixed_digits(&b[6..], 2)) {
        return None;
    }
    let mut len = 8;
    if b.get(len) == Some(&b'.') && is_digit(b.get(len + 1)) {
        len += 1;
        len += b[len..].iter().take_while(|c| c.is_ascii_digit()).count();
    }
    Some(len)
}

/// Match `Z`, `z` or `±HH:MM`; returns the length.
fn match_offset(b: &[u8]) -> Option<usize> {
    match b.first() {
        Some(b'Z' | b'z') => Some(1),
        Some(b'+' | b'-') => {
            if fixed_digits(&b[1..], 2) && b.get(3) == Some(&b':') && fixed_digits(&b[4..], 2) {
                Some(6)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn match_datetime(s: &str) -> Option<(usize, ScalarKind)> {
    let b = s.as_bytes();

    // A lone time-of-day.
    if let Some(len) = match_partial_time(b) {
        return Some((len, ScalarKind::LocalTime));
    }

    // Full date: YYYY-MM-DD.
    if !(fixed_digits(b, 4)
        && b.get(4) == Some(&b'-')
        && fixed_digits(&b[5..], 2)
        && b.get(7) == Some(&b'-')
        && fixed_digits(&b[8..], 2))
    {
        return None;
    }

    // Optional time part; a space separator only counts when a time shape
    // actually follows it.
    let sep = matches!(b.get(10), Some(b'T' | b't' | b' '));
    let time_len = if sep { match_partial_time(&b[11..]) } else { None };
    let Some(time_len) = time_len else {
        return Some((10, ScalarKind::LocalDate));
    };

    let len = 11 + time_len;
    match match_offset(&b[len..]) {
        Some(offset_len) => Some((len + offset_len, ScalarKind::OffsetDatetime)),
        None => Some((len, ScalarKind::LocalDatetime)),
    }
}

fn match_boolean(s: &str) -> Option<usize> {
    if s.starts_with("true") {
        Some(4)
    } else if s.starts_with("false") {
        Some(5)
    } else {
        None
    }
}

fn match_float(s: &str) -> Option<(usize, ScalarKind)> {
    let b = s.as_bytes();
    let signed = matches!(b.first(), Some(b'+' | b'-'));
    let start = usize::from(signed);

    if s[start..].starts_with("inf") {
        let kind = match b.first() {
            Some(b'+') => ScalarKind::FloatPosInf,
            Some(b'-') => ScalarKind::FloatNegInf,
            _ => ScalarKind::FloatInf,
        };
        return Some((start + 3, kind));
    }
    if s[start..].starts_with("nan") {
        let kind = match b.first() {
            Some(b'+') => ScalarKind::FloatPosNan,
            Some(b'-') => ScalarKind::FloatNegNan,
            _ => ScalarKind::FloatNan,
        };
        return Some((start + 3, kind));
    }

    let int_len = digit_run(&b[start..]);
    if int_len == 0 {
        return None;
    }
    let mut len = start + int_len;
    let mut has_frac = false;
    if b.get(len) == Some(&b'.') && is_digit(b.get(len + 1)) {
        has_frac = true;
        len += 1;
        len += digit_run(&b[len..]);
    }
    let mut has_exp = false;
    if matches!(b.get(len), Some(b'e' | b'E')) {
        let mut exp = len + 1;
        if matches!(b.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_len = digit_run(&b[exp..]);
        if exp_len > 0 {
            has_exp = true;
            len = exp + exp_len;
        }
    }

    if has_frac || has_exp {
        Some((len, ScalarKind::FloatNum))
    } else {
        None
    }
}

fn match_integer(s: &str) -> Option<(usize, ScalarKind)> {
    let b = s.as_bytes();

    let radix = match (b.first(), b.get(1)) {
        (Some(b'0'), Some(b'b')) => Some((2, ScalarKind::IntBin)),
        (Some(b'0'), Some(b'o')) => Some((8, ScalarKind::IntOct)),
        (Some(b'0'), Some(b'x')) => Some((16, ScalarKind::IntHex)),
        _ => None,
    };
    if let Some((radix, kind)) = radix {
        let mut len = 2;
        let mut digits = 0;
        while let Some(&c) = b.get(len) {
            if c == b'_' && digits > 0 {
                len += 1;
            } else if (c as char).to_digit(16).is_some_and(|d| d < radix) {
                digits += 1;
                len += 1;
            } else {
                break;
            }
        }
        if digits > 0 {
            return Some((len, kind));
        }
        return None;
    }

    let signed = matches!(b.first(), Some(b'+' | b'-'));
    let start = usize::from(signed);
    let len = digit_run(&b[start..]);
    if len > 0 {
        Some((start + len, ScalarKind::IntDec))
    } else {
        None
    }
}

fn match_bare(s: &str) -> Option<usize> {
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();
    if len > 0 {
        Some(len)
    } else {
        None
    }
}
