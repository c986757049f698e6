//! Brace-driven indentation for linker scripts
//!
//!     There is no parser behind this. The column of a line is inferred from brace cues on
//!     the line itself and on the lines before it, never the lines after it.
//!
//! Algorithm
//!
//!     1. The first line of a document is at column 0.
//!     2. Look at the current line, ignoring its leading whitespace:
//!         - it starts with `{`: use the previous line's column unchanged. A brace on its own
//!           line sits at the level of the header it opens.
//!         - it starts with `}`: use the previous line's column minus one unit.
//!     3. Otherwise scan backward from the previous line:
//!         - skip lines whose first visible character is inside a comment,
//!         - a line containing `}` gives its column minus one unit,
//!         - a line containing `{` gives its column plus one unit,
//!         - reaching the start of the document gives 0.
//!
//!     Results are not clamped. Unbalanced closing braces produce negative columns and it is
//!     up to whoever applies the column to decide what to do with them
//!     ([Document::set_indentation] clamps to 0).
//!
//! Brace detection
//!
//!     In [BraceDetection::Raw] mode braces are searched in the raw line text. Step 2 never
//!     consults the comment detector and step 3 sees braces in trailing comments, so a brace
//!     inside a comment can move a line. Existing scripts are indented with this behavior.
//!     [BraceDetection::CommentAware] blanks out comment text before looking for braces.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ldscript::comments::{blank_comments, CommentDetector, CommentScanner};
use crate::ldscript::document::{Document, Position};

/// How brace characters are detected on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BraceDetection {
    /// Search the raw line text, comments included
    #[default]
    Raw,
    /// Ignore braces that sit inside comments
    CommentAware,
}

/// Settings read by every indentation computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSettings {
    /// Columns added per nesting level
    pub unit: usize,
    pub brace_detection: BraceDetection,
}

impl IndentSettings {
    pub fn with_unit(unit: usize) -> Self {
        IndentSettings {
            unit,
            ..Self::default()
        }
    }

    fn step(&self) -> isize {
        self.unit as isize
    }
}

impl Default for IndentSettings {
    fn default() -> Self {
        IndentSettings {
            unit: 4,
            brace_detection: BraceDetection::Raw,
        }
    }
}

/// Which rule produced a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentRule {
    FirstLine,
    /// The line itself starts with `{`
    OpensBlock,
    /// The line itself starts with `}`
    ClosesBlock,
    /// Backward scan stopped on a line containing `}`
    AfterClose { line: usize },
    /// Backward scan stopped on a line containing `{`
    AfterOpen { line: usize },
    /// Backward scan reached the start of the document
    StartOfDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentDecision {
    pub column: isize,
    pub rule: IndentRule,
}

/// Compute the indentation column for `line`
pub fn compute_indent<C>(
    document: &Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> isize
where
    C: CommentDetector + ?Sized,
{
    decide_indent(document, line, settings, comments).column
}

/// Compute the indentation column for `line`, reporting the rule that decided it.
///
/// A line index past the end of the document is treated as an empty line after the last one.
pub fn decide_indent<C>(
    document: &Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> IndentDecision
where
    C: CommentDetector + ?Sized,
{
    let line = line.min(document.line_count());
    let decision = if line == 0 {
        IndentDecision {
            column: 0,
            rule: IndentRule::FirstLine,
        }
    } else {
        immediate_decision(document, line, settings, comments)
            .unwrap_or_else(|| scan_backward(document, line, settings, comments))
    };

    tracing::debug!(
        line,
        column = decision.column,
        rule = ?decision.rule,
        "computed indentation"
    );
    decision
}

fn immediate_decision<C>(
    document: &Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> Option<IndentDecision>
where
    C: CommentDetector + ?Sized,
{
    let text = brace_text(document, line, settings, comments);
    let previous = document.indentation(line - 1) as isize;

    match text.trim_start_matches([' ', '\t']).chars().next() {
        Some('{') => Some(IndentDecision {
            column: previous,
            rule: IndentRule::OpensBlock,
        }),
        Some('}') => Some(IndentDecision {
            column: previous - settings.step(),
            rule: IndentRule::ClosesBlock,
        }),
        _ => None,
    }
}

fn scan_backward<C>(
    document: &Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> IndentDecision
where
    C: CommentDetector + ?Sized,
{
    for index in (0..line).rev() {
        let commented = document
            .first_visible_column(index)
            .is_some_and(|column| comments.is_inside_comment(document, Position::new(index, column)));
        if commented {
            continue;
        }

        let text = brace_text(document, index, settings, comments);
        let column = document.indentation(index) as isize;
        if text.contains('}') {
            return IndentDecision {
                column: column - settings.step(),
                rule: IndentRule::AfterClose { line: index },
            };
        }
        if text.contains('{') {
            return IndentDecision {
                column: column + settings.step(),
                rule: IndentRule::AfterOpen { line: index },
            };
        }
    }

    IndentDecision {
        column: 0,
        rule: IndentRule::StartOfDocument,
    }
}

fn brace_text<'d, C>(
    document: &'d Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> Cow<'d, str>
where
    C: CommentDetector + ?Sized,
{
    let text = document.line(line).unwrap_or("");
    match settings.brace_detection {
        BraceDetection::Raw => Cow::Borrowed(text),
        BraceDetection::CommentAware => {
            let spans = comments.comment_spans_in_line(document, line);
            if spans.is_empty() {
                Cow::Borrowed(text)
            } else {
                Cow::Owned(blank_comments(text, &spans))
            }
        }
    }
}

/// Compute the column for `line` and apply it. Returns the computed (unclamped) column.
pub fn indent_line<C>(
    document: &mut Document,
    line: usize,
    settings: &IndentSettings,
    comments: &C,
) -> isize
where
    C: CommentDetector + ?Sized,
{
    let column = compute_indent(document, line, settings, comments);
    document.set_indentation(line, column);
    column
}

/// Reindent every non-blank line, top to bottom.
///
/// Each line is computed against the already reindented lines above it. Returns the number
/// of lines whose text changed.
pub fn reindent_document(document: &mut Document, settings: &IndentSettings) -> usize {
    let scanner = CommentScanner::new(document);
    let mut changed = 0;

    for line in 0..document.line_count() {
        if document.first_visible_column(line).is_none() {
            continue;
        }
        let column = compute_indent(document, line, settings, &scanner);
        if document.set_indentation(line, column) {
            changed += 1;
        }
    }

    tracing::debug!(
        lines = document.line_count(),
        changed,
        "reindented document"
    );
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn indent(lines: &[&str], line: usize, settings: IndentSettings) -> isize {
        let doc = Document::from_lines(lines.iter().copied());
        let scanner = CommentScanner::new(&doc);
        compute_indent(&doc, line, &settings, &scanner)
    }

    fn raw(lines: &[&str], line: usize) -> isize {
        indent(lines, line, IndentSettings::default())
    }

    fn aware(lines: &[&str], line: usize) -> isize {
        indent(
            lines,
            line,
            IndentSettings {
                unit: 4,
                brace_detection: BraceDetection::CommentAware,
            },
        )
    }

    #[test]
    fn test_first_line_is_zero() {
        assert_eq!(raw(&["    }"], 0), 0);
        assert_eq!(raw(&["        SECTIONS {"], 0), 0);
        assert_eq!(raw(&[], 0), 0);
    }

    #[test]
    fn test_sections_scenario() {
        let doc = [
            "SECTIONS {",
            "    .text : {",
            "        *(.text)",
            "    }",
            "}",
        ];
        let columns: Vec<isize> = (0..doc.len()).map(|line| raw(&doc, line)).collect();
        assert_eq!(columns, vec![0, 4, 8, 4, 0]);
    }

    #[test]
    fn test_brace_on_own_line_keeps_previous_column() {
        let doc = ["SECTIONS", "{", "    .text :", "    {"];
        assert_eq!(raw(&doc, 1), 0);
        assert_eq!(raw(&doc, 2), 4);
        assert_eq!(raw(&doc, 3), 4);
    }

    #[test]
    fn test_line_after_open_brace_is_indented() {
        assert_eq!(raw(&["  MEMORY {", "ram (rwx) : ORIGIN = 0"], 1), 6);
    }

    #[test]
    fn test_line_after_close_brace_uses_previous_minus_unit() {
        let doc = ["SECTIONS {", "    .data : {", "        *(.data)", "        }", "x"];
        assert_eq!(raw(&doc, 4), 4);
    }

    #[test]
    fn test_closing_brace_after_zero_column_goes_negative() {
        assert_eq!(raw(&["foo = 1;", "}"], 1), -4);
        assert_eq!(raw(&["}", "}"], 1), -4);
    }

    #[test]
    fn test_scan_reaching_start_returns_zero() {
        assert_eq!(raw(&["  a = 1;", "    b = 2;", "c = 3;"], 2), 0);
    }

    #[test]
    fn test_close_brace_checked_before_open_brace() {
        let doc = ["    .bss : { *(.bss) }", "_end = .;"];
        assert_eq!(raw(&doc, 1), 0);
    }

    #[test]
    fn test_blank_lines_are_scanned_past() {
        assert_eq!(raw(&["SECTIONS {", "", "   ", ".text"], 3), 4);
    }

    #[test]
    fn test_full_line_comment_is_skipped() {
        let with = ["SECTIONS {", "        /* } stray */", ".text"];
        let without = ["SECTIONS {", ".text"];
        assert_eq!(raw(&with, 2), 4);
        assert_eq!(raw(&with, 2), raw(&without, 1));
    }

    #[test]
    fn test_block_comment_lines_are_skipped() {
        let doc = [
            "SECTIONS {",
            "    /*",
            "     } {",
            "     */",
            ".text",
        ];
        assert_eq!(raw(&doc, 4), 4);
    }

    #[test]
    fn test_comment_after_unclosed_quote_is_skipped() {
        let doc = [
            "SECTIONS {",
            "x = \"a /* note",
            "  } still comment",
            "*/",
            "y",
        ];
        assert_eq!(raw(&doc, 4), 4);
    }

    #[test]
    fn test_raw_mode_sees_brace_in_trailing_comment() {
        let doc = ["    foo = 1; /* { */", "bar"];
        assert_eq!(raw(&doc, 1), 8);
        assert_eq!(aware(&doc, 1), 0);
    }

    #[test]
    fn test_raw_mode_current_line_ignores_comments() {
        let doc = ["    x = 1;", "/*", "  } retired", "*/"];
        assert_eq!(raw(&doc, 2), -4);
        assert_eq!(aware(&doc, 2), 0);

        let nested = ["SECTIONS {", "    x = 1;", "    /*", "  } retired"];
        assert_eq!(raw(&nested, 3), 0);
        assert_eq!(aware(&nested, 3), 4);
    }

    #[test]
    fn test_leading_comment_is_not_a_brace() {
        let doc = ["    a = 1;", "/* } */ b = 2;"];
        assert_eq!(raw(&doc, 1), 0);
        assert_eq!(aware(&doc, 1), 0);

        let after_open = ["SECTIONS {", "/* } */ b = 2;"];
        assert_eq!(aware(&after_open, 1), 4);
    }

    #[test]
    fn test_unit_is_read_per_call() {
        let doc = ["SECTIONS {", ".text"];
        assert_eq!(indent(&doc, 1, IndentSettings::with_unit(2)), 2);
        assert_eq!(indent(&doc, 1, IndentSettings::with_unit(8)), 8);
    }

    #[test]
    fn test_line_past_end_acts_as_new_line() {
        let doc = ["SECTIONS {", "    .text : {"];
        assert_eq!(raw(&doc, 2), 8);
        assert_eq!(raw(&doc, 40), 8);
    }

    #[rstest]
    #[case(&["a", "{"], 1, IndentRule::OpensBlock)]
    #[case(&["a", "}"], 1, IndentRule::ClosesBlock)]
    #[case(&["a {", "b"], 1, IndentRule::AfterOpen { line: 0 })]
    #[case(&["a }", "", "b"], 2, IndentRule::AfterClose { line: 0 })]
    #[case(&["a", "b"], 1, IndentRule::StartOfDocument)]
    #[case(&["a"], 0, IndentRule::FirstLine)]
    fn test_decision_rule(#[case] lines: &[&str], #[case] line: usize, #[case] rule: IndentRule) {
        let doc = Document::from_lines(lines.iter().copied());
        let scanner = CommentScanner::new(&doc);
        let decision = decide_indent(&doc, line, &IndentSettings::default(), &scanner);
        assert_eq!(decision.rule, rule);
    }

    #[test]
    fn test_indent_line_applies_column() {
        let mut doc = Document::from_lines(["MEMORY {", "ram : ORIGIN = 0"]);
        let scanner = CommentScanner::new(&doc);
        assert_eq!(indent_line(&mut doc, 1, &IndentSettings::default(), &scanner), 4);
        assert_eq!(doc.line(1), Some("    ram : ORIGIN = 0"));
    }

    #[test]
    fn test_reindent_document() {
        let mut doc =
            Document::from_text("SECTIONS {\n.text : {\n\n*(.text)\n  KEEP(*(.init))\n}\n}\n");
        let changed = reindent_document(&mut doc, &IndentSettings::default());

        assert_eq!(
            doc.to_text(),
            "SECTIONS {\n    .text : {\n\n        *(.text)\n        KEEP(*(.init))\n    }\n}\n"
        );
        assert_eq!(changed, 4);
    }

    #[test]
    fn test_reindent_clamps_unbalanced_close() {
        let mut doc = Document::from_text("x = 1;\n    }\n");
        reindent_document(&mut doc, &IndentSettings::default());
        assert_eq!(doc.to_text(), "x = 1;\n}\n");
    }

    #[test]
    fn test_reindent_is_idempotent() {
        let mut doc = Document::from_text("MEMORY\n{\n    rom : ORIGIN = 0\n}\n");
        assert_eq!(reindent_document(&mut doc, &IndentSettings::default()), 0);
    }
}
