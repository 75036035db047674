use super::ledger::{FileRecording, RecordingLedger};
use crate::error::{SnapshotError, SnapshotResult};
use crate::text::{
    EMPTY_LITERAL_CALL_SUFFIX, LiteralScanner, MULTILINE_DELIMITER, join_lines,
    leading_indentation, split_lines,
};
use std::path::PathBuf;

/// Inputs for one rewrite of one call site.
///
/// Never mutated; [`rewrite`] returns a copy carrying the new source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteContext {
    /// Full contents of the file
    pub source_code: String,
    /// Trimmed snapshot to embed
    pub diffable: String,
    /// Path identifying the file in the ledger
    pub file_name: PathBuf,
    /// Call site line as reported by the caller (1-based line of the call)
    pub line_index: usize,
}

impl RewriteContext {
    pub fn new(
        source_code: impl Into<String>,
        diffable: impl Into<String>,
        file_name: impl Into<PathBuf>,
        line_index: usize,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            diffable: diffable.into(),
            file_name: file_name.into(),
            line_index,
        }
    }

    pub fn with_source_code(&self, source_code: String) -> Self {
        Self {
            source_code,
            ..self.clone()
        }
    }
}

/// Embed `context.diffable` as the literal of the call site at `context.line_index`.
///
/// The reported line is corrected by the ledger's drift for this file, then:
/// - a trailing `"")` on the call line is expanded into an empty `"""` literal
///   spanning two lines;
/// - the body between the call line and the closing `"""` is replaced by the
///   payload, indented like the closing delimiter;
/// - the net line delta is appended to the ledger under the original line.
///
/// When no closing delimiter follows the call line, the context is returned
/// unchanged and nothing is recorded.
///
/// # Errors
/// - [`SnapshotError::LineOutOfRange`] if the corrected call line is not in the file
/// - [`SnapshotError::LiteralSyntax`] if the call line ends with neither marker
pub fn rewrite(
    ledger: &mut RecordingLedger,
    context: &RewriteContext,
) -> SnapshotResult<RewriteContext> {
    let mut lines: Vec<String> = split_lines(&context.source_code)
        .into_iter()
        .map(str::to_owned)
        .collect();

    let offset_start_index = ledger.offset_for(&context.file_name, context.line_index);
    // Reported lines point one past the call's opening line
    let function_line_index = offset_start_index
        .checked_sub(1)
        .filter(|&index| index < lines.len())
        .ok_or(SnapshotError::LineOutOfRange {
            line: offset_start_index,
            line_count: lines.len(),
        })?;

    let mut line_count_difference: isize = 0;

    if LiteralScanner::new(&lines).ends_with_empty_literal(function_line_index) {
        let function_line = lines.remove(function_line_index);
        let call = &function_line[..function_line.len() - EMPTY_LITERAL_CALL_SUFFIX.len()];
        let indentation = leading_indentation(&function_line);
        lines.insert(
            function_line_index,
            format!("{indentation}{MULTILINE_DELIMITER})"),
        );
        lines.insert(function_line_index, format!("{call}{MULTILINE_DELIMITER}"));
        line_count_difference += 1;
        log::debug!(
            target: "kakikomi::rewrite",
            "Expanded empty literal at {}:{}",
            context.file_name.display(),
            offset_start_index
        );
    }

    let scanner = LiteralScanner::new(&lines);
    if !scanner.ends_with_multiline_opener(function_line_index) {
        return Err(SnapshotError::LiteralSyntax {
            line: context.line_index,
        });
    }

    let Some(closing_index) = scanner.find_closing_delimiter(offset_start_index) else {
        log::warn!(
            target: "kakikomi::rewrite",
            "No closing {} after {}:{}, leaving source untouched",
            MULTILINE_DELIMITER,
            context.file_name.display(),
            offset_start_index
        );
        return Ok(context.clone());
    };

    let indentation = leading_indentation(&lines[closing_index]).to_owned();
    let payload: Vec<String> = split_lines(&context.diffable)
        .into_iter()
        .map(|line| format!("{indentation}{line}"))
        .collect();

    line_count_difference += payload.len() as isize - (closing_index - offset_start_index) as isize;

    let recorded = ledger.record(
        &context.file_name,
        FileRecording::new(context.line_index, line_count_difference),
    );
    log::debug!(
        target: "kakikomi::rewrite",
        "Rewrote {}:{} (now line {}), {:+} lines, new recording: {}",
        context.file_name.display(),
        context.line_index,
        offset_start_index,
        line_count_difference,
        recorded
    );

    lines.splice(offset_start_index..closing_index, payload);

    Ok(context.with_source_code(join_lines(&lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const FILE: &str = "Tests/FooTests.swift";

    fn context(source: &str, diffable: &str, line: usize) -> RewriteContext {
        RewriteContext::new(source, diffable, FILE, line)
    }

    #[test]
    fn test_empty_literal_is_expanded_and_filled() {
        let mut ledger = RecordingLedger::new();
        let source = "func testFoo() {\n    assertInline(foo, \"\")\n}\n";

        let result = rewrite(&mut ledger, &context(source, "A\nB", 2)).unwrap();

        insta::assert_snapshot!(result.source_code, @r#"
        func testFoo() {
            assertInline(foo, """
            A
            B
            """)
        }
        "#);
        assert_eq!(
            ledger.recordings(Path::new(FILE)),
            &[FileRecording::new(2, 3)]
        );
    }

    #[test]
    fn test_empty_literal_with_empty_payload() {
        let mut ledger = RecordingLedger::new();
        let source = "foo(with: \"\")";

        let result = rewrite(&mut ledger, &context(source, "", 1)).unwrap();

        // The empty payload still occupies one (indented, empty) line
        assert_eq!(result.source_code, "foo(with: \"\"\"\n\n\"\"\")");
        assert_eq!(ledger.recordings(Path::new(FILE)), &[FileRecording::new(1, 2)]);
    }

    #[test]
    fn test_existing_body_is_replaced() {
        let mut ledger = RecordingLedger::new();
        let source = "  check(\"\"\"\n  old 1\n  old 2\n  old 3\n  \"\"\")\n";

        let result = rewrite(&mut ledger, &context(source, "new", 1)).unwrap();

        assert_eq!(result.source_code, "  check(\"\"\"\n  new\n  \"\"\")\n");
        assert_eq!(ledger.recordings(Path::new(FILE)), &[FileRecording::new(1, -2)]);
    }

    #[test]
    fn test_payload_indentation_follows_closing_delimiter() {
        let mut ledger = RecordingLedger::new();
        let source = "check(\"\"\"\n      \"\"\")";

        let result = rewrite(&mut ledger, &context(source, "x\n  y\n", 1)).unwrap();

        assert_eq!(
            result.source_code,
            "check(\"\"\"\n      x\n        y\n      \n      \"\"\")"
        );
    }

    #[test]
    fn test_drift_is_applied_to_later_call_sites() {
        let mut ledger = RecordingLedger::new();
        let source = concat!(
            "func testA() {\n",
            "    assertInline(foo, \"\")\n",
            "}\n",
            "func testB() {\n",
            "    assertInline(bar, \"\")\n",
            "}\n",
        );

        let first = rewrite(&mut ledger, &context(source, "A\nB", 2)).unwrap();
        let second = rewrite(&mut ledger, &context(&first.source_code, "C", 5)).unwrap();

        insta::assert_snapshot!(second.source_code, @r#"
        func testA() {
            assertInline(foo, """
            A
            B
            """)
        }
        func testB() {
            assertInline(bar, """
            C
            """)
        }
        "#);
        assert_eq!(
            ledger.recordings(Path::new(FILE)),
            &[FileRecording::new(2, 3), FileRecording::new(5, 2)]
        );
    }

    #[test]
    fn test_later_call_site_rewritten_first_does_not_shift_earlier_one() {
        let mut ledger = RecordingLedger::new();
        let source = "a(\"\")\nb\nc(\"\")";

        let first = rewrite(&mut ledger, &context(source, "C1\nC2", 3)).unwrap();
        let second = rewrite(&mut ledger, &context(&first.source_code, "A", 1)).unwrap();

        assert_eq!(
            second.source_code,
            "a(\"\"\"\nA\n\"\"\")\nb\nc(\"\"\"\nC1\nC2\n\"\"\")"
        );
    }

    #[test]
    fn test_missing_closing_delimiter_is_noop() {
        let mut ledger = RecordingLedger::new();
        let source = "check(\"\"\"\n  body\n  still body";
        let ctx = context(source, "new", 1);

        let result = rewrite(&mut ledger, &ctx).unwrap();

        assert_eq!(result, ctx);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_non_literal_argument_is_rejected() {
        let mut ledger = RecordingLedger::new();
        let source = "check(foo, expected)\n";

        let err = rewrite(&mut ledger, &context(source, "new", 1)).unwrap_err();

        assert!(matches!(err, SnapshotError::LiteralSyntax { line: 1 }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_line_outside_file_is_rejected() {
        let mut ledger = RecordingLedger::new();

        let zero = rewrite(&mut ledger, &context("check(\"\")", "x", 0)).unwrap_err();
        let past_end = rewrite(&mut ledger, &context("check(\"\")", "x", 3)).unwrap_err();

        assert!(matches!(zero, SnapshotError::LineOutOfRange { line: 0, .. }));
        assert!(matches!(
            past_end,
            SnapshotError::LineOutOfRange { line: 3, line_count: 1 }
        ));
    }

    #[test]
    fn test_repeated_identical_rewrite_is_flagged_as_repeat() {
        let mut ledger = RecordingLedger::new();
        let source = "check(\"\"\"\nold\n\"\"\")";

        let first = rewrite(&mut ledger, &context(source, "new", 1)).unwrap();
        let second = rewrite(&mut ledger, &context(&first.source_code, "new", 1)).unwrap();

        assert_eq!(second.source_code, first.source_code);
        assert_eq!(ledger.len_for(Path::new(FILE)), 2);
        assert!(ledger.last_is_repeat(Path::new(FILE)));
    }

    #[test]
    fn test_same_site_rewritten_twice_keeps_drift_for_later_sites() {
        let mut ledger = RecordingLedger::new();
        let source = "check(a, \"\")\nb\ncheck(c, \"\")";

        // Both rewrites of line 1 add two lines
        let first = rewrite(&mut ledger, &context(source, "A", 1)).unwrap();
        let second = rewrite(&mut ledger, &context(&first.source_code, "B\nC\nD", 1)).unwrap();
        let third = rewrite(&mut ledger, &context(&second.source_code, "E", 3)).unwrap();

        assert_eq!(
            third.source_code,
            "check(a, \"\"\"\nB\nC\nD\n\"\"\")\nb\ncheck(c, \"\"\"\nE\n\"\"\")"
        );
    }
}
