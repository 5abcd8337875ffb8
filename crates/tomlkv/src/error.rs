//! Error classification and reporting.
//!
//! Every error latches the driver and attaches a positioned message to the
//! root key's `error/*` metadata, mirroring what [`ReadError`] carries back
//! to the caller.

use std::fmt;

use tomlkv_parse::Location;
use tomlkv_store::KeyHandle;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An internal invariant was violated.
    Internal,
    /// Allocation failure (kept for interface completeness; safe Rust
    /// aborts instead of reporting this).
    Memory,
    /// The document does not match the grammar.
    Syntactic,
    /// The document is well-formed but violates a language rule.
    Semantic,
    /// The document could not be opened or read.
    Resource,
}

impl ErrorKind {
    /// Stable lowercase name, used in metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal",
            ErrorKind::Memory => "memory",
            ErrorKind::Syntactic => "syntactic",
            ErrorKind::Semantic => "semantic",
            ErrorKind::Resource => "resource",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read failure with its position.
#[derive(Debug, Clone)]
pub struct ReadError {
    /// Error classification.
    pub kind: ErrorKind,
    /// Line the error was detected on.
    pub line: u32,
    /// The offending source range.
    pub loc: Location,
    /// The bare message, without the position prefix.
    pub message: String,
}

impl ReadError {
    /// The position prefix used in formatted messages: the end column is
    /// printed exclusive.
    fn position(&self) -> String {
        format!(
            "Line {}~({}:{}-{}:{})",
            self.line,
            self.loc.first_line,
            self.loc.first_column,
            self.loc.last_line,
            self.loc.last_column.saturating_sub(1)
        )
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ErrorKind::Memory {
            return f.write_str("Out of memory");
        }
        write!(f, "{}: {}", self.position(), self.message)
    }
}

impl std::error::Error for ReadError {}

/// Record an error on the root key and build the matching [`ReadError`].
pub(crate) fn set_error(
    root: &KeyHandle,
    kind: ErrorKind,
    line: u32,
    loc: Location,
    message: String,
) -> ReadError {
    let error = ReadError {
        kind,
        line,
        loc,
        message,
    };
    let mut key = root.borrow_mut();
    key.set_meta("error/kind", kind.as_str());
    key.set_meta("error/reason", error.to_string());
    key.set_meta("error/line", line.to_string());
    key.set_meta(
        "error/span",
        format!(
            "{}:{}-{}:{}",
            loc.first_line,
            loc.first_column,
            loc.last_line,
            loc.last_column.saturating_sub(1)
        ),
    );
    error
}

/// Record the fixed out-of-memory error on the root key.
pub(crate) fn set_out_of_memory(root: &KeyHandle) -> ReadError {
    set_error(
        root,
        ErrorKind::Memory,
        0,
        Location::default(),
        "Out of memory".to_string(),
    )
}
