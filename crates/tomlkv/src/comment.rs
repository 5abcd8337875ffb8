//! The pending-comment list.
//!
//! Comments and blank lines accumulate here until the next key materializes,
//! then drain into that key's metadata. Stored convention: preceding
//! comments occupy `comment/#0`, `comment/#1`, ... in order; a real comment
//! also writes `comment/#n/start = "#"`, a pure blank-line separator leaves
//! `comment/#n` empty without a start marker; blank lines before an entry go
//! to `comment/#n/blanks`. A trailing comment on the same line as its key is
//! stored under `inline/comment`.

use tomlkv_store::Key;

/// One pending comment or blank-line run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommentEntry {
    /// Comment text (everything after `#`), or `None` for a pure blank-line
    /// separator.
    pub text: Option<String>,
    /// The comment as it appeared in the source.
    pub orig: Option<String>,
    /// Blank lines before the comment; for a separator entry, the size of
    /// the blank run itself.
    pub blank_lines: u32,
}

impl CommentEntry {
    /// The comment marker as it appeared in the source (`orig` minus the
    /// text), falling back to `#`.
    fn start_marker(&self) -> &str {
        match (&self.orig, &self.text) {
            (Some(orig), Some(text)) => orig.strip_suffix(text.as_str()).unwrap_or("#"),
            _ => "#",
        }
    }
}

/// Ordered pending comments. The first entry is the inline-comment
/// candidate; the rest become preceding comments of the next key.
#[derive(Debug, Default)]
pub(crate) struct CommentList {
    entries: Vec<CommentEntry>,
}

impl CommentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a comment, with the blank lines that preceded it.
    pub fn push_comment(&mut self, text: String, orig: String, blank_lines: u32) {
        self.entries.push(CommentEntry {
            text: Some(text),
            orig: Some(orig),
            blank_lines,
        });
    }

    /// Append a pure blank-line separator.
    pub fn push_blanks(&mut self, blank_lines: u32) {
        self.entries.push(CommentEntry {
            text: None,
            orig: None,
            blank_lines,
        });
    }

    /// Detach the first entry (the inline-comment candidate).
    pub fn pop_front(&mut self) -> Option<CommentEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Write all entries as preceding comments of `key` and clear the list.
    pub fn write_to(&mut self, key: &mut Key) {
        for (i, entry) in self.entries.drain(..).enumerate() {
            match &entry.text {
                Some(text) => {
                    key.set_meta(&format!("comment/#{i}"), text.clone());
                    key.set_meta(&format!("comment/#{i}/start"), entry.start_marker());
                }
                None => {
                    key.set_meta(&format!("comment/#{i}"), "");
                }
            }
            if entry.blank_lines > 0 {
                key.set_meta(&format!("comment/#{i}/blanks"), entry.blank_lines.to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Write one entry as the inline (trailing) comment of `key`.
pub(crate) fn write_inline_comment(key: &mut Key, entry: &CommentEntry) {
    key.set_meta("inline/comment", entry.text.clone().unwrap_or_default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomlkv_store::{Key, KeyName};

    #[test]
    fn test_drain_order_and_markers() {
        let mut list = CommentList::new();
        list.push_comment(" first".into(), "# first".into(), 0);
        list.push_comment(" second".into(), "# second".into(), 2);
        list.push_blanks(1);

        let mut key = Key::new(KeyName::new("/k"));
        list.write_to(&mut key);
        assert!(list.is_empty());

        assert_eq!(key.meta("comment/#0"), Some(" first"));
        assert_eq!(key.meta("comment/#0/start"), Some("#"));
        assert_eq!(key.meta("comment/#1"), Some(" second"));
        assert_eq!(key.meta("comment/#1/blanks"), Some("2"));
        assert_eq!(key.meta("comment/#2"), Some(""));
        assert_eq!(key.meta("comment/#2/start"), None);
        assert_eq!(key.meta("comment/#2/blanks"), Some("1"));
    }

    #[test]
    fn test_pop_front() {
        let mut list = CommentList::new();
        list.push_comment(" inline".into(), "# inline".into(), 0);
        list.push_comment(" rest".into(), "# rest".into(), 0);
        let first = list.pop_front().unwrap();
        assert_eq!(first.text.as_deref(), Some(" inline"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_inline_comment() {
        let mut key = Key::new(KeyName::new("/k"));
        let entry = CommentEntry {
            text: Some(" note".into()),
            orig: Some("# note".into()),
            blank_lines: 0,
        };
        write_inline_comment(&mut key, &entry);
        assert_eq!(key.meta("inline/comment"), Some(" note"));
    }
}
