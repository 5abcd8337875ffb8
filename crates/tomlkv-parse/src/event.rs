//! Grammar events delivered by the parser.
//!
//! One event per grammar production, in grammar order. The driver that
//! builds keys implements [`crate::ParseCallback`] and reacts to each.

use crate::{Location, Scalar};

/// Events emitted by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// End of document.
    DocumentEnd,

    // Keys
    /// Start of a (possibly dotted) key.
    KeyStart,
    /// One dotted-key segment.
    SimpleKey(Scalar),
    /// The whole key has been read.
    KeyEnd,

    // Values
    /// A scalar value.
    Value(Scalar),
    /// A `key = value` pair is complete.
    KeyPairEnd,
    /// End of a keypair line, after its optional trailing comment.
    KeyPairCommentEnd,

    // Tables
    /// A `[name]` header begins.
    SimpleTableStart,
    /// The `[name]` header is complete.
    SimpleTableEnd,
    /// A `[[name]]` header begins.
    TableArrayStart,
    /// The `[[name]]` header is complete.
    TableArrayEnd,
    /// End of a table-header line, after its optional trailing comment.
    TableCommentEnd,

    // Arrays
    /// An array value `[ ... ]` opens.
    ArrayStart,
    /// The array closes.
    ArrayEnd,
    /// An empty array `[]`.
    ArrayEmpty,
    /// The next array element begins.
    ArrayElementStart,
    /// The current array element is complete.
    ArrayElementEnd,

    // Inline tables
    /// An inline table `{ ... }` opens.
    InlineTableStart,
    /// The inline table closes.
    InlineTableEnd,
    /// An empty inline table `{}`.
    InlineTableEmpty,

    // Trivia with round-trip meaning
    /// A `# ...` comment; the scalar text is everything after the `#`.
    Comment(Scalar),
    /// A blank line (newlines that terminate statements are structural and
    /// not reported).
    Newline,

    /// A syntax error. Parsing stops after this event.
    Error {
        /// Line the error was detected on.
        line: u32,
        /// Full source range of the offending token.
        loc: Location,
        /// Human-readable description.
        message: String,
    },
}
