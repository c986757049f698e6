//! Lexical classification for highlighting
//!
//!     Highlighting is a static table of patterns (see [rules]). [classify_line] runs the table
//!     over a single line and yields `(span, category)` pairs ordered by position. It keeps no
//!     state between lines, so it cannot see block comments that span lines;
//!     [classify_document] adds those using the comment scanner.
//!
//! Precedence
//!
//!     Categories are not ranked against each other. What matters is table order: when two
//!     rules match overlapping text, the earlier rule keeps it. This is how `SORT_BY_NAME`
//!     stays a keyword and `*(.text)` stays a wildcard pattern instead of a bare section name.

pub mod rules;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::ldscript::comments::CommentScanner;
use crate::ldscript::document::Document;
pub use rules::{HighlightRule, BUILTINS, HIGHLIGHT_RULES, KEYWORDS, WARNING_TOKENS};

/// Display category of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Keyword,
    Builtin,
    SectionName,
    /// The `*` of a `*(...)` input section pattern
    Wildcard,
    /// The parenthesized part of a `*(...)` input section pattern
    WildcardSection,
    HexAddress,
    Warning,
    Comment,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Keyword,
        Category::Builtin,
        Category::SectionName,
        Category::Wildcard,
        Category::WildcardSection,
        Category::HexAddress,
        Category::Warning,
        Category::Comment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Builtin => "builtin",
            Category::SectionName => "section-name",
            Category::Wildcard => "wildcard",
            Category::WildcardSection => "wildcard-section",
            Category::HexAddress => "hex-address",
            Category::Warning => "warning",
            Category::Comment => "comment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified span of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub span: Range<usize>,
    pub category: Category,
}

impl Highlight {
    pub fn new(span: Range<usize>, category: Category) -> Self {
        Highlight { span, category }
    }

    fn overlaps(&self, other: &Range<usize>) -> bool {
        self.span.start < other.end && other.start < self.span.end
    }
}

/// Classified spans of one line, in order of position.
///
/// Overlap between rules can only be settled once every rule has run, so the spans are
/// collected when the line is classified and handed out one at a time. Cloning restarts
/// the sequence.
#[derive(Debug, Clone)]
pub struct Highlights {
    inner: std::vec::IntoIter<Highlight>,
}

impl Iterator for Highlights {
    type Item = Highlight;

    fn next(&mut self) -> Option<Highlight> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Highlights {}

/// Classify a single line with the highlight table
pub fn classify_line(line: &str) -> Highlights {
    let mut claimed: Vec<Highlight> = Vec::new();

    for rule in HIGHLIGHT_RULES.iter() {
        for captures in rule.pattern.captures_iter(line) {
            let spans: Vec<Highlight> = rule
                .groups
                .iter()
                .filter_map(|(group, category)| {
                    captures
                        .get(*group)
                        .filter(|m| !m.is_empty())
                        .map(|m| Highlight::new(m.range(), *category))
                })
                .collect();

            let taken = spans
                .iter()
                .any(|candidate| claimed.iter().any(|h| h.overlaps(&candidate.span)));
            if !taken {
                claimed.extend(spans);
            }
        }
    }

    claimed.sort_by_key(|h| h.span.start);
    Highlights {
        inner: claimed.into_iter(),
    }
}

/// Classified spans of one document line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineHighlights {
    pub line: usize,
    pub highlights: Vec<Highlight>,
}

/// Classify every line of a document, including block comments.
///
/// Comment spans are tagged [Category::Comment] and hide any other match inside them.
pub fn classify_document(document: &Document, comments: &CommentScanner) -> Vec<LineHighlights> {
    document
        .lines()
        .enumerate()
        .map(|(index, text)| {
            let comment_spans = comments.line_comments(document, index).spans;
            let mut highlights: Vec<Highlight> = classify_line(text)
                .filter(|h| !comment_spans.iter().any(|span| h.overlaps(span)))
                .collect();
            highlights.extend(
                comment_spans
                    .into_iter()
                    .map(|span| Highlight::new(span, Category::Comment)),
            );
            highlights.sort_by_key(|h| h.span.start);

            LineHighlights {
                line: index,
                highlights,
            }
        })
        .collect()
}
