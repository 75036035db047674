//! Inline literal markers and the scanner that finds them.
//!
//! Only two shapes are recognised: an empty literal closing the call on one
//! line (`foo(with: "")`), and a multi-line literal opened at the end of the
//! call line and closed by a later line containing the delimiter.

use super::lines::{leading_indentation, split_lines};

/// An empty literal immediately followed by the call's closing paren.
pub const EMPTY_LITERAL_CALL_SUFFIX: &str = "\"\")";

/// Opens and closes a multi-line literal.
pub const MULTILINE_DELIMITER: &str = "\"\"\"";

/// Read-only view over source lines that locates literal boundaries.
pub struct LiteralScanner<'a, S> {
    lines: &'a [S],
}

impl<'a, S: AsRef<str>> LiteralScanner<'a, S> {
    pub fn new(lines: &'a [S]) -> Self {
        Self { lines }
    }

    fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).map(AsRef::as_ref)
    }

    /// Whether the line ends with `"")`, not counting a `""")` closer.
    pub fn ends_with_empty_literal(&self, index: usize) -> bool {
        self.line(index).is_some_and(|line| {
            line.strip_suffix(EMPTY_LITERAL_CALL_SUFFIX)
                .is_some_and(|rest| !rest.ends_with('"'))
        })
    }

    /// Whether the line ends with an opening `"""`.
    pub fn ends_with_multiline_opener(&self, index: usize) -> bool {
        self.line(index)
            .is_some_and(|line| line.ends_with(MULTILINE_DELIMITER))
    }

    /// First line at or after `from` that contains `"""`.
    pub fn find_closing_delimiter(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&i| {
            self.line(i)
                .is_some_and(|line| line.contains(MULTILINE_DELIMITER))
        })
    }
}

/// Read the literal currently embedded at a call site.
///
/// `reported_line` is the 1-based line of the call, which is also the
/// 0-based index of the first body line. Body lines lose the closing
/// delimiter's indentation. An empty `"")` literal yields `Some("")`.
pub fn extract_literal(source: &str, reported_line: usize) -> Option<String> {
    let lines = split_lines(source);
    let call_line = reported_line.checked_sub(1)?;
    let scanner = LiteralScanner::new(&lines);

    if scanner.ends_with_empty_literal(call_line) {
        return Some(String::new());
    }
    if !scanner.ends_with_multiline_opener(call_line) {
        return None;
    }

    let closing = scanner.find_closing_delimiter(reported_line)?;
    let indentation = leading_indentation(lines[closing]);
    let body: Vec<&str> = lines[reported_line..closing]
        .iter()
        .map(|line| match line.strip_prefix(indentation) {
            Some(rest) => rest,
            // Blank lines may have lost their indentation to an editor
            None if line.trim().is_empty() => "",
            None => line,
        })
        .collect();
    Some(body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_literal("    foo(with: \"\")", true, false)]
    #[case::opener("    foo(with: \"\"\"", false, true)]
    #[case::closer("    \"\"\")", false, false)]
    #[case::filled_literal("    foo(with: \"x\")", false, false)]
    #[case::trailing_space("    foo(with: \"\") ", false, false)]
    fn test_marker_detection(
        #[case] line: &str,
        #[case] empty_literal: bool,
        #[case] opener: bool,
    ) {
        let lines = [line];
        let scanner = LiteralScanner::new(&lines);
        assert_eq!(scanner.ends_with_empty_literal(0), empty_literal);
        assert_eq!(scanner.ends_with_multiline_opener(0), opener);
    }

    #[test]
    fn test_marker_detection_out_of_range_is_false() {
        let lines: [&str; 0] = [];
        let scanner = LiteralScanner::new(&lines);
        assert!(!scanner.ends_with_empty_literal(3));
        assert!(!scanner.ends_with_multiline_opener(3));
        assert_eq!(scanner.find_closing_delimiter(0), None);
    }

    #[test]
    fn test_find_closing_delimiter_starts_at_from() {
        let lines = ["foo(\"\"\"", "  a", "  \"\"\")", "bar(\"\"\"", "\"\"\")"];
        let scanner = LiteralScanner::new(&lines);
        assert_eq!(scanner.find_closing_delimiter(1), Some(2));
        assert_eq!(scanner.find_closing_delimiter(2), Some(2));
        assert_eq!(scanner.find_closing_delimiter(3), Some(3));
        assert_eq!(scanner.find_closing_delimiter(5), None);
    }

    #[test]
    fn test_extract_multiline_literal_dedents_body() {
        let source = "func test() {\n    foo(with: \"\"\"\n    A\n      B\n\n    \"\"\")\n}\n";
        assert_eq!(extract_literal(source, 2), Some("A\n  B\n".to_string()));
    }

    #[test]
    fn test_extract_empty_literal() {
        let source = "func test() {\n    foo(with: \"\")\n}\n";
        assert_eq!(extract_literal(source, 2), Some(String::new()));
    }

    #[test]
    fn test_extract_without_literal_returns_none() {
        let source = "func test() {\n    foo(with: bar)\n}\n";
        assert_eq!(extract_literal(source, 2), None);
        assert_eq!(extract_literal(source, 0), None);
        assert_eq!(extract_literal(source, 42), None);
    }

    #[test]
    fn test_extract_unterminated_literal_returns_none() {
        let source = "foo(with: \"\"\"\n  A\n  B";
        assert_eq!(extract_literal(source, 1), None);
    }
}
