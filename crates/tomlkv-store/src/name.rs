//! Hierarchical key names.

use std::fmt;

/// A hierarchical key name: an ordered list of path segments.
///
/// The textual form is `/`-separated and always starts with `/`. A `/` or
/// `\` inside a segment is escaped with a backslash, so `"k/x"` under the
/// root renders as `/k\/x` and parses back to one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyName {
    segments: Vec<String>,
}

impl KeyName {
    /// Parse a name from its escaped textual form.
    pub fn new(name: &str) -> Self {
        let name = name.strip_prefix('/').unwrap_or(name);
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        for c in name.chars() {
            if escaped {
                current.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '/' {
                segments.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() || !segments.is_empty() {
            segments.push(current);
        }
        if segments.len() == 1 && segments[0].is_empty() {
            segments.clear();
        }
        Self { segments }
    }

    /// Build a name directly from unescaped segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The unescaped segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root name `/`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append one segment (given unescaped).
    pub fn push(&mut self, segment: &str) {
        self.segments.push(segment.to_string());
    }

    /// Append an array-index segment `#n`.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(format!("#{index}"));
    }

    /// The last segment, if any.
    pub fn base_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The name one level up, or `None` for the root.
    pub fn parent(&self) -> Option<KeyName> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether `other` is a strict descendant of `self`.
    pub fn is_ancestor_of(&self, other: &KeyName) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// The segments of `self` below `ancestor`, if `ancestor` really is one.
    pub fn rel_to(&self, ancestor: &KeyName) -> Option<&[String]> {
        if ancestor.is_ancestor_of(self) {
            Some(&self.segments[ancestor.segments.len()..])
        } else {
            None
        }
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            f.write_str("/")?;
            for c in segment.chars() {
                if c == '/' || c == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = KeyName::new("/a/b/c");
        assert_eq!(name.len(), 3);
        assert_eq!(name.to_string(), "/a/b/c");
        assert_eq!(KeyName::new("/").to_string(), "/");
        assert_eq!(KeyName::new("").to_string(), "/");
    }

    #[test]
    fn test_escaped_segments() {
        let mut name = KeyName::new("/");
        name.push("k/x");
        assert_eq!(name.to_string(), "/k\\/x");
        let reparsed = KeyName::new(&name.to_string());
        assert_eq!(reparsed.segments(), name.segments());
    }

    #[test]
    fn test_index_segments() {
        let mut name = KeyName::new("/a");
        name.push_index(0);
        assert_eq!(name.to_string(), "/a/#0");
        name.push_index(42);
        assert_eq!(name.to_string(), "/a/#0/#42");
    }

    #[test]
    fn test_parent() {
        let name = KeyName::new("/a/b");
        assert_eq!(name.parent().unwrap().to_string(), "/a");
        assert_eq!(KeyName::new("/a").parent().unwrap().to_string(), "/");
        assert!(KeyName::new("/").parent().is_none());
    }

    #[test]
    fn test_is_ancestor_of() {
        let a = KeyName::new("/a");
        let ab = KeyName::new("/a/b");
        let ax = KeyName::new("/ax");
        assert!(a.is_ancestor_of(&ab));
        assert!(!a.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&ax));
        assert!(KeyName::new("/").is_ancestor_of(&a));
    }

    #[test]
    fn test_rel_to() {
        let a = KeyName::new("/a");
        let abc = KeyName::new("/a/b/c");
        assert_eq!(abc.rel_to(&a).unwrap(), ["b", "c"]);
        assert!(a.rel_to(&abc).is_none());
    }
}
