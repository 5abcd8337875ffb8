//! The scalar model: one TOML literal with its source form, plus the
//! translation into the canonical stored text.

use crate::{Location, Token};

/// The kind of a TOML literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Basic string `"..."`.
    StringBasic,
    /// Literal string `'...'`.
    StringLiteral,
    /// Multiline basic string `"""..."""`.
    StringMlBasic,
    /// Multiline literal string `'''...'''`.
    StringMlLiteral,
    /// Bare (unquoted) word.
    StringBare,
    /// Decimal integer.
    IntDec,
    /// Binary integer `0b...`.
    IntBin,
    /// Octal integer `0o...`.
    IntOct,
    /// Hexadecimal integer `0x...`.
    IntHex,
    /// Numeric float (fraction and/or exponent).
    FloatNum,
    /// `+inf`
    FloatPosInf,
    /// `-inf`
    FloatNegInf,
    /// `inf`
    FloatInf,
    /// `+nan`
    FloatPosNan,
    /// `-nan`
    FloatNegNan,
    /// `nan`
    FloatNan,
    /// `true` or `false`.
    Boolean,
    /// RFC 3339 datetime with offset.
    OffsetDatetime,
    /// Datetime without offset.
    LocalDatetime,
    /// Date without time.
    LocalDate,
    /// Time without date.
    LocalTime,
}

impl ScalarKind {
    /// Whether this is one of the four string-literal kinds (bare excluded).
    pub fn is_quoted_string(&self) -> bool {
        matches!(
            self,
            ScalarKind::StringBasic
                | ScalarKind::StringLiteral
                | ScalarKind::StringMlBasic
                | ScalarKind::StringMlLiteral
        )
    }

    /// Whether this is one of the four datetime kinds.
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            ScalarKind::OffsetDatetime
                | ScalarKind::LocalDatetime
                | ScalarKind::LocalDate
                | ScalarKind::LocalTime
        )
    }
}

/// A single TOML literal as read from the source.
///
/// `text` is the lexeme with surrounding quotes stripped but escape
/// sequences and digit separators intact; it is the "original" form kept for
/// the `origvalue` metadata when translation changes the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    /// What kind of literal this is.
    pub kind: ScalarKind,
    /// Source text, without string quotes.
    pub text: String,
    /// Line the literal starts on (1-based).
    pub line: u32,
    /// Full source range of the literal.
    pub loc: Location,
}

impl Scalar {
    /// Build a scalar from a lexed token, stripping string quotes.
    pub fn from_token(token: &Token<'_>, kind: ScalarKind) -> Self {
        let text = match kind {
            ScalarKind::StringBasic | ScalarKind::StringLiteral => {
                strip_quotes(token.text, 1).to_string()
            }
            ScalarKind::StringMlBasic | ScalarKind::StringMlLiteral => {
                strip_quotes(token.text, 3).to_string()
            }
            _ => token.text.to_string(),
        };
        Self {
            kind,
            text,
            line: token.loc.first_line,
            loc: token.loc,
        }
    }

    /// Build a synthesized bare-string scalar (used for split dotted keys
    /// and in tests).
    pub fn bare(text: impl Into<String>, line: u32, loc: Location) -> Self {
        Self {
            kind: ScalarKind::StringBare,
            text: text.into(),
            line,
            loc,
        }
    }

    /// Translate this literal into its canonical stored text.
    ///
    /// Strings get their escapes processed, numbers are normalized to plain
    /// decimal, booleans become `1`/`0` and datetimes are canonicalized to
    /// their RFC 3339 spelling.
    pub fn translate(&self) -> String {
        match self.kind {
            ScalarKind::StringBare | ScalarKind::StringLiteral => self.text.clone(),
            ScalarKind::StringMlLiteral => trim_leading_newline(&self.text).to_string(),
            ScalarKind::StringBasic => unescape_basic(&self.text, false),
            ScalarKind::StringMlBasic => unescape_basic(trim_leading_newline(&self.text), true),
            ScalarKind::Boolean => {
                let bit = if self.text == "true" { "1" } else { "0" };
                bit.to_string()
            }
            ScalarKind::IntDec => normalize_dec_integer(&self.text),
            ScalarKind::IntBin => normalize_radix_integer(&self.text, 2),
            ScalarKind::IntOct => normalize_radix_integer(&self.text, 8),
            ScalarKind::IntHex => normalize_radix_integer(&self.text, 16),
            ScalarKind::FloatNum => normalize_float(&self.text),
            ScalarKind::FloatPosInf => "+inf".to_string(),
            ScalarKind::FloatNegInf => "-inf".to_string(),
            ScalarKind::FloatInf => "inf".to_string(),
            ScalarKind::FloatPosNan => "+nan".to_string(),
            ScalarKind::FloatNegNan => "-nan".to_string(),
            ScalarKind::FloatNan => "nan".to_string(),
            ScalarKind::OffsetDatetime
            | ScalarKind::LocalDatetime
            | ScalarKind::LocalDate
            | ScalarKind::LocalTime => normalize_datetime(&self.text),
        }
    }
}

/// Whether `s` is a valid bare key segment: `[A-Za-z0-9_-]+` (the empty
/// string passes, matching quoted empty keys).
pub fn is_bare_string(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn strip_quotes(raw: &str, width: usize) -> &str {
    if raw.len() >= 2 * width {
        &raw[width..raw.len() - width]
    } else {
        raw
    }
}

/// Multiline strings drop a newline immediately following the opening
/// delimiter.
fn trim_leading_newline(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix("\r\n") {
        rest
    } else if let Some(rest) = s.strip_prefix('\n') {
        rest
    } else {
        s
    }
}

/// Process basic-string escapes. In multiline mode a backslash before a
/// newline swallows the newline and all following whitespace.
fn unescape_basic(s: &str, multiline: bool) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => result.push('\u{0008}'),
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('f') => result.push('\u{000C}'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('u') => push_unicode_escape(&mut chars, &mut result, 4),
            Some('U') => push_unicode_escape(&mut chars, &mut result, 8),
            Some(c2 @ ('\n' | '\r' | ' ' | '\t')) if multiline => {
                // Line continuation: skip whitespace up to and past the
                // newline, then keep skipping leading whitespace.
                let mut seen_newline = c2 == '\n';
                while let Some(&next) = chars.peek() {
                    match next {
                        '\n' => {
                            seen_newline = true;
                            chars.next();
                        }
                        '\r' | ' ' | '\t' => {
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if !seen_newline {
                    // Not a continuation after all; keep the text verbatim.
                    result.push('\\');
                    result.push(c2);
                }
            }
            Some(other) => {
                // Unknown escape, kept verbatim.
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

fn push_unicode_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    result: &mut String,
    digits: usize,
) {
    let mut hex = String::with_capacity(digits);
    for _ in 0..digits {
        match chars.peek() {
            Some(&c) if c.is_ascii_hexdigit() => {
                hex.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    if hex.len() == digits {
        if let Ok(code) = u32::from_str_radix(&hex, 16) {
            if let Some(c) = char::from_u32(code) {
                result.push(c);
                return;
            }
        }
    }
    // Malformed escape, kept verbatim.
    result.push('\\');
    result.push(if digits == 4 { 'u' } else { 'U' });
    result.push_str(&hex);
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|&c| c != '_').collect()
}

fn normalize_dec_integer(s: &str) -> String {
    let stripped = strip_separators(s);
    match stripped.parse::<i64>() {
        Ok(value) => value.to_string(),
        Err(_) => stripped,
    }
}

fn normalize_radix_integer(s: &str, radix: u32) -> String {
    let stripped = strip_separators(s);
    let digits = stripped
        .strip_prefix("0b")
        .or_else(|| stripped.strip_prefix("0o"))
        .or_else(|| stripped.strip_prefix("0x"))
        .unwrap_or(&stripped);
    match u64::from_str_radix(digits, radix) {
        Ok(value) => value.to_string(),
        Err(_) => stripped,
    }
}

/// Shortest round-trip digits, in plain decimal near 1 and scientific
/// notation once the magnitude would pad the plain form with zero runs
/// (`Display` on floats never switches to an exponent on its own).
fn normalize_float(s: &str) -> String {
    let stripped = strip_separators(s);
    let value: f64 = match stripped.parse() {
        Ok(value) => value,
        Err(_) => return stripped,
    };
    if !value.is_finite() {
        return stripped;
    }
    let magnitude = value.abs();
    if value != 0.0 && (magnitude < 1e-5 || magnitude >= 1e16) {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

/// Canonical RFC 3339 spelling: `T` between date and time, uppercase `Z`.
fn normalize_datetime(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' | 't' => 'T',
            'z' => 'Z',
            other => other,
        })
        .collect()
}
