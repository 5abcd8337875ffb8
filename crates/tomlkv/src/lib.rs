//! Reads TOML documents into ordered, metadata-rich key sets.
//!
//! A document is flattened onto a hierarchical keyspace: every value
//! becomes a key whose slash-separated name encodes the table path, with
//! metadata preserving everything needed for a lossless round trip (source
//! spelling under `origvalue`, comment placement, TOML sub-type under
//! `tomltype`, emission order under `order`, array extents under `array`).
//!
//! ```
//! use tomlkv::{key_handle, read_str, Key, KeyName, KeySet};
//!
//! let root = key_handle(Key::new(KeyName::new("/")));
//! let mut keys = KeySet::new();
//! read_str("[server]\nport = 80\n", &mut keys, &root).unwrap();
//!
//! let port = keys.lookup_name("/server/port").unwrap();
//! assert_eq!(port.borrow().string(), "80");
//! assert_eq!(port.borrow().meta("type"), Some("long_long"));
//! assert_eq!(port.borrow().meta("order"), Some("1"));
//! ```
//!
//! Errors never recover: the first one wins, the store keeps every key
//! emitted before it, and the error is both returned and mirrored into
//! `error/*` metadata on the root key.

mod comment;
mod datetime;
mod diagnostic;
mod driver;
mod error;
mod special;

pub use error::{ErrorKind, ReadError};
pub use tomlkv_parse::{
    Event, Location, ParseCallback, Parser, Scalar, ScalarKind, Span,
};
pub use tomlkv_store::{key_handle, Key, KeyHandle, KeyName, KeySet, KeyValue};

use driver::Driver;

/// Read the TOML file named by `parent`'s value into `keys`.
///
/// The parent key doubles as the configuration surface: its value is the
/// path of the document to read, its name becomes the prefix of every
/// emitted key, and errors are attached to it. A file that cannot be opened
/// reports [`ErrorKind::Resource`].
pub fn read(keys: &mut KeySet, parent: &KeyHandle) -> Result<(), ReadError> {
    let filename = parent.borrow().string().to_string();
    let source = match std::fs::read_to_string(&filename) {
        Ok(source) => source,
        Err(io) => {
            return Err(error::set_error(
                parent,
                ErrorKind::Resource,
                0,
                Location::default(),
                format!("Failed to open file '{filename}': {io}"),
            ));
        }
    };
    read_str(&source, keys, parent)
}

/// Read an in-memory TOML document into `keys`, with key names below
/// `parent`'s name.
///
/// On error the store keeps all keys emitted before the failure.
pub fn read_str(source: &str, keys: &mut KeySet, parent: &KeyHandle) -> Result<(), ReadError> {
    let mut driver = Driver::new(parent.clone(), keys);
    Parser::new(source).parse(&mut driver);
    driver.finish()
}
