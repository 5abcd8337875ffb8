//! An ordered set of keys addressed by name.

use indexmap::IndexMap;

use crate::{KeyHandle, KeyName};

/// Keys in insertion order, addressable by name.
///
/// Appending a key whose name is already present replaces the stored handle
/// but keeps the original position, so iteration order always reflects first
/// emission.
#[derive(Debug, Default)]
pub struct KeySet {
    keys: IndexMap<String, KeyHandle>,
}

impl KeySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key under its current name.
    pub fn append(&mut self, key: KeyHandle) {
        let name = key.borrow().name().to_string();
        self.keys.insert(name, key);
    }

    /// Look up a key by name.
    pub fn lookup(&self, name: &KeyName) -> Option<KeyHandle> {
        self.keys.get(&name.to_string()).cloned()
    }

    /// Look up a key by its textual name.
    pub fn lookup_name(&self, name: &str) -> Option<KeyHandle> {
        self.lookup(&KeyName::new(name))
    }

    /// Iterate over the keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyHandle> {
        self.keys.values()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key_handle, Key};

    fn key(name: &str) -> KeyHandle {
        key_handle(Key::new(KeyName::new(name)))
    }

    #[test]
    fn test_append_and_lookup() {
        let mut set = KeySet::new();
        set.append(key("/a"));
        set.append(key("/b"));
        assert_eq!(set.len(), 2);
        assert!(set.lookup(&KeyName::new("/a")).is_some());
        assert!(set.lookup(&KeyName::new("/c")).is_none());
    }

    #[test]
    fn test_insertion_order() {
        let mut set = KeySet::new();
        set.append(key("/z"));
        set.append(key("/a"));
        set.append(key("/m"));
        let names: Vec<String> = set.iter().map(|k| k.borrow().name().to_string()).collect();
        assert_eq!(names, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut set = KeySet::new();
        set.append(key("/a"));
        set.append(key("/b"));
        let replacement = key("/a");
        replacement.borrow_mut().set_string("new");
        set.append(replacement);
        assert_eq!(set.len(), 2);
        let names: Vec<String> = set.iter().map(|k| k.borrow().name().to_string()).collect();
        assert_eq!(names, vec!["/a", "/b"]);
        assert_eq!(set.lookup_name("/a").unwrap().borrow().string(), "new");
    }

    #[test]
    fn test_same_handle_append_twice() {
        let mut set = KeySet::new();
        let handle = key("/a");
        set.append(handle.clone());
        handle.borrow_mut().set_meta("tomltype", "simpletable");
        set.append(handle);
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.lookup_name("/a").unwrap().borrow().meta("tomltype"),
            Some("simpletable")
        );
    }
}
