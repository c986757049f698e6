//! Testing utilities for indentation assertions
//!
//! # Indentation Testing Guidelines
//!
//! Indentation tests compare whole columns of numbers, so a failing test should show every
//! line, not just the first mismatch. The helpers here print the script with expected and
//! computed columns side by side.
//!
//! ## Rule 1: Use LdSources for larger scripts
//!
//! Short snippets can live in the test. Anything that looks like a real linker script
//! belongs in `samples/` and is read through
//! [LdSources](crate::ldscript::processor::ld_sources::LdSources), so every test sees the
//! same curated text.
//!
//! ## Rule 2: Compute against settled lines
//!
//! The engine only looks backward. [indents_of] computes every line against the document as
//! written, which is what an editor does when the script is already indented. Use
//! [assert_reindent_fixed_point] when the question is whether a script is stable under
//! reindentation.
//!
//! ```rust,ignore
//! use ldmode::ldscript::testing::assert_indents;
//!
//! assert_indents("SECTIONS {\n    .text : {\n        *(.text)\n    }\n}", &[0, 4, 8, 4, 0]);
//! ```

use crate::ldscript::comments::CommentScanner;
use crate::ldscript::document::Document;
use crate::ldscript::indentation::{compute_indent, reindent_document, IndentSettings};

/// Computed column of every line, with default settings
pub fn indents_of(source: &str) -> Vec<isize> {
    indents_with(source, &IndentSettings::default())
}

/// Computed column of every line
pub fn indents_with(source: &str, settings: &IndentSettings) -> Vec<isize> {
    let document = Document::from_text(source);
    let scanner = CommentScanner::new(&document);
    (0..document.line_count())
        .map(|line| compute_indent(&document, line, settings, &scanner))
        .collect()
}

fn render_columns(document: &Document, expected: &[isize], actual: &[isize]) -> String {
    let mut out = String::new();
    for (index, text) in document.lines().enumerate() {
        let expected = expected.get(index).map(|c| c.to_string()).unwrap_or_default();
        let actual = actual.get(index).map(|c| c.to_string()).unwrap_or_default();
        let marker = if expected == actual { " " } else { ">" };
        out.push_str(&format!(
            "{} {:>3} | {:>4} {:>4} | {}\n",
            marker,
            index + 1,
            expected,
            actual,
            text
        ));
    }
    out
}

/// Assert the computed column of every line
#[track_caller]
pub fn assert_indents(source: &str, expected: &[isize]) {
    assert_indents_with(source, &IndentSettings::default(), expected);
}

/// Assert the computed column of every line with explicit settings
#[track_caller]
pub fn assert_indents_with(source: &str, settings: &IndentSettings, expected: &[isize]) {
    let actual = indents_with(source, settings);
    if actual != expected {
        let document = Document::from_text(source);
        panic!(
            "indentation mismatch (line | expected computed | text):\n{}",
            render_columns(&document, expected, &actual)
        );
    }
}

/// Assert that reindenting `source` changes nothing
#[track_caller]
pub fn assert_reindent_fixed_point(source: &str, settings: &IndentSettings) {
    let mut document = Document::from_text(source);
    let changed = reindent_document(&mut document, settings);
    if changed != 0 {
        panic!(
            "reindentation changed {} line(s):\n--- before\n{}\n--- after\n{}",
            changed,
            source,
            document.to_text()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_indents_accepts_matching_columns() {
        assert_indents(
            "SECTIONS {\n    .text : {\n        *(.text)\n    }\n}",
            &[0, 4, 8, 4, 0],
        );
    }

    #[test]
    #[should_panic(expected = "indentation mismatch")]
    fn test_assert_indents_reports_mismatch() {
        assert_indents("SECTIONS {\n.text", &[0, 8]);
    }

    #[test]
    fn test_render_marks_differing_lines() {
        let document = Document::from_lines(["a {", "b"]);
        let rendered = render_columns(&document, &[0, 8], &[0, 4]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with(' '));
        assert!(lines[1].starts_with('>'));
    }

    #[test]
    #[should_panic(expected = "reindentation changed 1 line(s)")]
    fn test_fixed_point_detects_changes() {
        assert_reindent_fixed_point("SECTIONS {\n.text\n", &IndentSettings::default());
    }
}
