//! Keys: a name, a value, and ordered metadata.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::KeyName;

/// The value slot of a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyValue {
    /// No value set yet (table and structural keys).
    #[default]
    Empty,
    /// A textual value.
    String(String),
    /// A binary value.
    Binary(Vec<u8>),
}

/// A single configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Key {
    name: KeyName,
    value: KeyValue,
    meta: IndexMap<String, String>,
}

/// Shared handle to a key.
///
/// The reader holds one key from several owners at once (current/previous
/// slots, stack frames, the key set), so keys are reference-counted and
/// mutable through any holder.
pub type KeyHandle = Rc<RefCell<Key>>;

/// Wrap a key into a shared handle.
pub fn key_handle(key: Key) -> KeyHandle {
    Rc::new(RefCell::new(key))
}

impl Key {
    /// Create a key with the given name and no value.
    pub fn new(name: KeyName) -> Self {
        Self {
            name,
            value: KeyValue::Empty,
            meta: IndexMap::new(),
        }
    }

    /// Create a key that shares another key's name but nothing else.
    pub fn with_name_of(other: &Key) -> Self {
        Self::new(other.name.clone())
    }

    /// The key's name.
    pub fn name(&self) -> &KeyName {
        &self.name
    }

    /// Mutable access to the name (used while a dotted key is built up).
    pub fn name_mut(&mut self) -> &mut KeyName {
        &mut self.name
    }

    /// The last segment of the name, or `""` for the root.
    pub fn base_name(&self) -> &str {
        self.name.base_name().unwrap_or("")
    }

    /// The raw value slot.
    pub fn value(&self) -> &KeyValue {
        &self.value
    }

    /// Set a textual value.
    pub fn set_string(&mut self, value: impl Into<String>) {
        self.value = KeyValue::String(value.into());
    }

    /// Set a binary value.
    pub fn set_binary(&mut self, data: Vec<u8>) {
        self.value = KeyValue::Binary(data);
    }

    /// The textual value, or `""` when none is set.
    pub fn string(&self) -> &str {
        match &self.value {
            KeyValue::String(s) => s,
            _ => "",
        }
    }

    /// Whether the value slot holds binary data.
    pub fn is_binary(&self) -> bool {
        matches!(self.value, KeyValue::Binary(_))
    }

    /// Set one metadata entry.
    pub fn set_meta(&mut self, name: &str, value: impl Into<String>) {
        self.meta.insert(name.to_string(), value.into());
    }

    /// Look up one metadata entry.
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    /// All metadata entries in insertion order.
    pub fn meta_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.meta.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
