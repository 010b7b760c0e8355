//! Manifest parsing
//!
//! A manifest is plain text with one entry per line:
//!
//! ```text
//! # comparator  test page            reference page
//! ==            tiny-dom.html        tiny-dom-ref.html
//! <             fast-path.html       slow-path.html   # trailing comment
//! ```
//!
//! Everything from `#` onward is a comment and blank lines are skipped. Any
//! other line that is not `<cmp> <test> <ref>` rejects the whole manifest.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Comparator, ManifestEntry};

/// Parsed manifest, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text, keeping only the entry whose test path equals
    /// `filter` when one is given.
    pub fn parse(text: &str, filter: Option<&str>) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, raw) in text.split('\n').enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let entry = parse_line(line).ok_or(Error::ManifestSyntax { line: index + 1 })?;

            if filter.map_or(true, |wanted| wanted == entry.test_path) {
                entries.push(entry);
            }
        }

        debug!(entries = entries.len(), filtered = filter.is_some(), "Parsed manifest");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for Manifest {
    type Item = ManifestEntry;
    type IntoIter = std::vec::IntoIter<ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_line(line: &str) -> Option<ManifestEntry> {
    let mut tokens = line.split_whitespace();
    let comparator = Comparator::from_symbol(tokens.next()?)?;
    let test_path = tokens.next()?;
    let ref_path = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(ManifestEntry::new(comparator, test_path, ref_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# perf reftests
== a.html a-ref.html
< b.html  b-ref.html   # b should be much faster

\t<\tc.html\tshared-ref.html
== d.html shared-ref.html
";

    #[test]
    fn test_parse_keeps_declaration_order() {
        let manifest = Manifest::parse(SAMPLE, None).unwrap();
        let tests: Vec<&str> = manifest.iter().map(|e| e.test_path.as_str()).collect();
        assert_eq!(tests, vec!["a.html", "b.html", "c.html", "d.html"]);
        assert_eq!(manifest.entries[1], ManifestEntry::new(Comparator::LessThan, "b.html", "b-ref.html"));
    }

    #[test]
    fn test_comments_and_blank_lines_only() {
        let manifest = Manifest::parse("# nothing here\n\n   \n#== a b\n", None).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let manifest = Manifest::parse("== a.html b.html\r\n< c.html d.html\r\n", None).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries[1].ref_path, "d.html");
    }

    #[test]
    fn test_syntax_error_reports_one_based_line() {
        let text = "== a.html a-ref.html\n\n# comment\n<= b.html b-ref.html\n== c.html c-ref.html\n";
        let err = Manifest::parse(text, None).unwrap_err();
        assert!(matches!(err, Error::ManifestSyntax { line: 4 }));
        assert_eq!(err.to_string(), "Failed to load manifest: syntax error on line 4");
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert!(matches!(
            Manifest::parse("== only-test.html", None),
            Err(Error::ManifestSyntax { line: 1 })
        ));
        assert!(matches!(
            Manifest::parse("== a b c", None),
            Err(Error::ManifestSyntax { line: 1 })
        ));
        assert!(matches!(
            Manifest::parse("==a.html b.html", None),
            Err(Error::ManifestSyntax { line: 1 })
        ));
    }

    #[test]
    fn test_syntax_error_wins_over_filter() {
        let err = Manifest::parse("== a.html b.html\nbogus\n", Some("a.html")).unwrap_err();
        assert!(matches!(err, Error::ManifestSyntax { line: 2 }));
    }

    #[test]
    fn test_filter_selects_matching_test() {
        let manifest = Manifest::parse(SAMPLE, Some("c.html")).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries[0].ref_path, "shared-ref.html");
    }

    #[test]
    fn test_filter_does_not_match_reference_paths() {
        let manifest = Manifest::parse(SAMPLE, Some("shared-ref.html")).unwrap();
        assert!(manifest.is_empty());
    }
}
