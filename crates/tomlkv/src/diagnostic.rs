//! Diagnostic rendering for read errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{ErrorKind, ReadError};

impl ReadError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source
    /// context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = std::ops::Range::from(self.loc.span);
        let label = match self.kind {
            ErrorKind::Syntactic => "the grammar breaks here",
            ErrorKind::Semantic => "this violates a language rule",
            ErrorKind::Resource => "could not read the document",
            ErrorKind::Internal | ErrorKind::Memory => "reader gave up here",
        };
        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(&self.message)
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

#[cfg(test)]
mod tests {
    use tomlkv_store::{key_handle, Key, KeyName, KeySet};

    use crate::read_str;

    #[test]
    fn test_render_duplicate_key() {
        let source = "a = 1\na = 2\n";
        let root = key_handle(Key::new(KeyName::new("/")));
        let mut keys = KeySet::new();
        let err = read_str(source, &mut keys, &root).unwrap_err();

        let rendered = err.render("dup.toml", source);
        assert!(rendered.contains("Multiple occurences"), "{rendered}");
        assert!(rendered.contains("dup.toml"), "{rendered}");
    }

    #[test]
    fn test_render_syntax_error() {
        let source = "a =\n";
        let root = key_handle(Key::new(KeyName::new("/")));
        let mut keys = KeySet::new();
        let err = read_str(source, &mut keys, &root).unwrap_err();

        let rendered = err.render("bad.toml", source);
        assert!(rendered.contains("syntax error"), "{rendered}");
    }
}
