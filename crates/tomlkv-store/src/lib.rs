//! Hierarchically-named key/value store with per-key metadata.
//!
//! A [`Key`] carries a slash-separated [`KeyName`], a string or binary
//! value, and an ordered metadata map. A [`KeySet`] keeps keys in insertion
//! order and looks them up by name. Keys are shared through [`KeyHandle`]s
//! (`Rc<RefCell<Key>>`): the reader that populates a set holds the same key
//! from several owners at once (stack frames, current/previous slots, the
//! set itself), so shared mutable handles are the natural model. The store
//! is strictly single-threaded.

mod key;
mod keyset;
mod name;

pub use key::{key_handle, Key, KeyHandle, KeyValue};
pub use keyset::KeySet;
pub use name::KeyName;
