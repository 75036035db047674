//! Line splitting that round-trips exactly.
//!
//! `str::lines` drops a trailing empty line and swallows `\r`, which would
//! make a rewrite silently change the file's final newline. These helpers
//! split on `\n` only and keep every segment.

/// Split text into lines on `\n`, keeping empty segments.
///
/// # Example
///
/// ```
/// use kakikomi::text::split_lines;
///
/// assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
/// assert_eq!(split_lines(""), vec![""]);
/// ```
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Join lines with `\n`. Inverse of [`split_lines`].
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let capacity = lines.iter().map(|l| l.as_ref().len() + 1).sum();
    let mut joined = String::with_capacity(capacity);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(line.as_ref());
    }
    joined
}

/// Leading run of spaces and tabs.
pub fn leading_indentation(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}
