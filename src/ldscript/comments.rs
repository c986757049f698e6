//! Block comment detection
//!
//!     The indentation engine needs one question answered: is this position inside a comment?
//!     That question is the [CommentDetector] trait. [CommentScanner] is the implementation
//!     used everywhere in this crate.
//!
//! Semantics
//!
//!     `/*` opens a comment and the next `*/` closes it, whatever lies in between. Comments do
//!     not nest. Double quoted text outside a comment is opaque, so `"/*"` opens nothing. A
//!     quote with no closing quote on the same line is ordinary punctuation.
//!     A comment span covers its delimiters: a line that is a complete `/* ... */` comment is
//!     inside a comment from its first visible character.
//!
//! Checkpoints
//!
//!     Whether a line starts inside a comment depends only on the lines before it. The scanner
//!     records that state for every line when it is built, so a query replays a single line.
//!     Changing leading whitespace never moves a delimiter, so reindentation keeps every
//!     checkpoint valid. Other edits call [CommentScanner::rescan_from].

pub mod tokens;

use std::ops::Range;

use logos::{Lexer, Logos};

use crate::ldscript::document::{Document, Position};
use tokens::{CodeToken, CommentToken};

/// Comment spans of a single line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineComments {
    pub spans: Vec<Range<usize>>,
    pub ends_in_comment: bool,
}

/// The "is this position inside a comment?" primitive
pub trait CommentDetector {
    fn is_inside_comment(&self, document: &Document, position: Position) -> bool;

    /// Byte ranges of a line that lie inside comments.
    ///
    /// The default probes every column through [CommentDetector::is_inside_comment].
    fn comment_spans_in_line(&self, document: &Document, line: usize) -> Vec<Range<usize>> {
        let Some(text) = document.line(line) else {
            return Vec::new();
        };

        let mut spans: Vec<Range<usize>> = Vec::new();
        for column in 0..text.len() {
            if !self.is_inside_comment(document, Position::new(line, column)) {
                continue;
            }
            match spans.last_mut() {
                Some(span) if span.end == column => span.end = column + 1,
                _ => spans.push(column..column + 1),
            }
        }
        spans
    }
}

enum Mode<'s> {
    /// Lexer over the line from byte `offset` on
    Code(Lexer<'s, CodeToken>, usize),
    /// Lexer over the line from byte `offset` on, and where the open comment started
    Comment(Lexer<'s, CommentToken>, usize, usize),
}

/// Find the comment spans of one line, given whether it starts inside a comment
pub fn comment_spans(line: &str, starts_in_comment: bool) -> LineComments {
    let mut spans = Vec::new();
    let mut mode = if starts_in_comment {
        Mode::Comment(CommentToken::lexer(line), 0, 0)
    } else {
        Mode::Code(CodeToken::lexer(line), 0)
    };

    loop {
        mode = match mode {
            Mode::Code(mut lexer, offset) => {
                let stop = lexer.by_ref().find(|token| {
                    !matches!(
                        token,
                        Ok(CodeToken::Quoted | CodeToken::Text | CodeToken::Punct)
                    )
                });
                match stop {
                    Some(Ok(_)) => {
                        let start = offset + lexer.span().start;
                        Mode::Comment(lexer.morph(), offset, start)
                    }
                    // An unclosed quote is plain punctuation; lexing resumes right after it
                    Some(Err(())) => {
                        let resume = offset + lexer.span().start + 1;
                        Mode::Code(CodeToken::lexer(&line[resume..]), resume)
                    }
                    None => {
                        return LineComments {
                            spans,
                            ends_in_comment: false,
                        };
                    }
                }
            }
            Mode::Comment(mut lexer, offset, start) => {
                if lexer
                    .by_ref()
                    .any(|token| token == Ok(CommentToken::CommentClose))
                {
                    spans.push(start..offset + lexer.span().end);
                    Mode::Code(lexer.morph(), offset)
                } else {
                    if start < line.len() {
                        spans.push(start..line.len());
                    }
                    return LineComments {
                        spans,
                        ends_in_comment: true,
                    };
                }
            }
        };
    }
}

/// Replace every commented byte of `line` with a space, keeping columns stable
pub fn blank_comments(line: &str, spans: &[Range<usize>]) -> String {
    if spans.is_empty() {
        return line.to_string();
    }

    let mut visible = String::with_capacity(line.len());
    for (index, ch) in line.char_indices() {
        if spans.iter().any(|span| span.contains(&index)) {
            visible.push(' ');
        } else {
            visible.push(ch);
        }
    }
    visible
}

/// Block comment scanner with per-line checkpoints
#[derive(Debug, Clone, Default)]
pub struct CommentScanner {
    starts_in_comment: Vec<bool>,
}

impl CommentScanner {
    /// Scan the whole document once
    pub fn new(document: &Document) -> Self {
        let mut scanner = CommentScanner::default();
        scanner.extend(document);
        scanner
    }

    /// Rebuild checkpoints after `line` was edited.
    ///
    /// The state at the start of `line` does not depend on its own text, so it is kept.
    pub fn rescan_from(&mut self, document: &Document, line: usize) {
        self.starts_in_comment
            .truncate(line.saturating_add(1).min(document.line_count()));
        self.extend(document);
        tracing::trace!(
            line,
            checkpoints = self.starts_in_comment.len(),
            "rescanned comment checkpoints"
        );
    }

    fn extend(&mut self, document: &Document) {
        let mut index = self.starts_in_comment.len();
        let mut state = self.starts_in_comment.last().copied().unwrap_or(false);
        if index > 0 {
            state = document
                .line(index - 1)
                .map(|text| comment_spans(text, state).ends_in_comment)
                .unwrap_or(state);
        }

        while index < document.line_count() {
            self.starts_in_comment.push(state);
            if let Some(text) = document.line(index) {
                state = comment_spans(text, state).ends_in_comment;
            }
            index += 1;
        }
    }

    /// Whether `line` starts inside a block comment.
    ///
    /// Lines beyond the recorded checkpoints are replayed from the last one.
    pub fn starts_in_comment(&self, document: &Document, line: usize) -> bool {
        if let Some(state) = self.starts_in_comment.get(line) {
            return *state;
        }

        let (mut index, mut state) = match self.starts_in_comment.last() {
            Some(state) => (self.starts_in_comment.len() - 1, *state),
            None => (0, false),
        };
        while index < line {
            match document.line(index) {
                Some(text) => state = comment_spans(text, state).ends_in_comment,
                None => break,
            }
            index += 1;
        }
        state
    }

    /// Comment spans and end state for one line
    pub fn line_comments(&self, document: &Document, line: usize) -> LineComments {
        match document.line(line) {
            Some(text) => comment_spans(text, self.starts_in_comment(document, line)),
            None => LineComments::default(),
        }
    }
}

impl CommentDetector for CommentScanner {
    fn is_inside_comment(&self, document: &Document, position: Position) -> bool {
        let Some(text) = document.line(position.line) else {
            return false;
        };
        let comments = self.line_comments(document, position.line);
        if position.column >= text.len() {
            return comments.ends_in_comment;
        }
        comments
            .spans
            .iter()
            .any(|span| span.contains(&position.column))
    }

    fn comment_spans_in_line(&self, document: &Document, line: usize) -> Vec<Range<usize>> {
        self.line_comments(document, line).spans
    }
}
