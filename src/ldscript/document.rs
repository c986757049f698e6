//! Line buffer over a linker script snapshot
//!
//!     The indentation engine and the comment scanner never work on raw strings. They read a
//!     [Document]: an ordered list of lines with the derived values both of them need (the
//!     indentation column and the position of the first visible character).
//!
//!     Lines are stored without their terminators. The terminator style of the source (the
//!     one used by its first line break) and whether it ends with one are remembered, so that
//!     [Document::to_text] reproduces an unedited input byte for byte as long as it uses a
//!     single style.
//!
//!     The only mutation offered is [Document::set_indentation], the mechanical "apply a
//!     column" step that follows an indentation computation.

use std::fmt;

/// A location inside a document. `column` is a byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Line terminator written by [Document::to_text]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Terminator style of `source`, taken from its first line break
    pub fn detect(source: &str) -> Self {
        match source.find('\n') {
            Some(index) if source[..index].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Ordered sequence of script lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl Document {
    /// Split source text into lines. Both `\n` and `\r\n` terminators are accepted.
    pub fn from_text(source: &str) -> Self {
        let trailing_newline = source.ends_with('\n');
        let lines = source
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Document {
            lines,
            line_ending: LineEnding::detect(source),
            trailing_newline,
        }
    }

    /// Build a document from already separated lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Document {
            lines: lines.into_iter().map(Into::into).collect(),
            line_ending: LineEnding::Lf,
            trailing_newline: false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Indentation column of a line: the number of leading space or tab characters.
    /// Lines past the end have column 0.
    pub fn indentation(&self, index: usize) -> usize {
        self.line(index).map(indentation_of).unwrap_or(0)
    }

    /// Byte column of the first non-whitespace character, if the line has one
    pub fn first_visible_column(&self, index: usize) -> Option<usize> {
        let line = self.line(index)?;
        let indent = indentation_of(line);
        (indent < line.len()).then_some(indent)
    }

    /// Replace a line's leading whitespace with `column` spaces.
    ///
    /// Negative columns are clamped to 0. Returns true when the line changed.
    pub fn set_indentation(&mut self, index: usize, column: isize) -> bool {
        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };

        let column = column.max(0) as usize;
        let content_start = indentation_of(line);
        let already_applied = content_start == column
            && line.as_bytes()[..content_start].iter().all(|b| *b == b' ');
        if already_applied {
            return false;
        }

        let mut updated = " ".repeat(column);
        updated.push_str(&line[content_start..]);
        *line = updated;
        true
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Join lines back into text with the source's terminator
    pub fn to_text(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut text = self.lines.join(ending);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(ending);
        }
        text
    }
}

/// Count leading space and tab characters
pub fn indentation_of(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}
