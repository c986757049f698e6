//! File processing API for linker scripts
//!
//! This module runs one of the editing services over a whole file and renders the result.
//! A processing specification is written `<stage>-<format>`:
//!
//! - `highlight-simple`, `highlight-json`: classified spans per line
//! - `indent-simple`, `indent-json`: computed column for every line, against the file as is
//! - `reindent-simple`: the file with every line reindented
//!
//! # Sample Sources
//!
//! The `ld_sources` module provides access to the curated sample scripts under `samples/`.
//! Tests should read scripts through it instead of embedding larger scripts inline.
//!
//! ```rust,ignore
//! use ldmode::ldscript::processor::ld_sources::LdSources;
//!
//! let content = LdSources::get_string("000-sections.ld").unwrap();
//! let columns = LdSources::get_processed("010-memory.ld", "indent-simple").unwrap();
//! ```

use crate::ldscript::comments::CommentScanner;
use crate::ldscript::document::Document;
use crate::ldscript::highlight::{classify_document, LineHighlights};
use crate::ldscript::indentation::{decide_indent, reindent_document, IndentDecision, IndentSettings};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Represents the processing stage (which service to run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Highlight,
    Indent,
    Reindent,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "highlight-json" or "indent-simple"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage, format)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };

        let stage = match stage {
            "highlight" => ProcessingStage::Highlight,
            "indent" => ProcessingStage::Indent,
            "reindent" => ProcessingStage::Reindent,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        if stage == ProcessingStage::Reindent && format == OutputFormat::Json {
            return Err(ProcessingError::InvalidFormatType(
                "Format 'json' not supported for reindent stage (only 'simple' is supported)"
                    .to_string(),
            ));
        }

        Ok(ProcessingSpec { stage, format })
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec {
                stage: ProcessingStage::Highlight,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Highlight,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Indent,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Indent,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Reindent,
                format: OutputFormat::Simple,
            },
        ]
    }
}

impl fmt::Display for ProcessingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            ProcessingStage::Highlight => "highlight",
            ProcessingStage::Indent => "indent",
            ProcessingStage::Reindent => "reindent",
        };
        let format = match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
        };
        write!(f, "{}-{}", stage, format)
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    FileNotFound(String),
    InvalidFormat(String),
    InvalidStage(String),
    InvalidFormatType(String),
    InvalidLine(usize),
    IoError(String),
}

impl std::error::Error for ProcessingError {}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::FileNotFound(path) => write!(f, "File not found: {}", path),
            ProcessingError::InvalidFormat(format) => write!(f, "Invalid format: {}", format),
            ProcessingError::InvalidStage(stage) => write!(f, "Invalid stage: {}", stage),
            ProcessingError::InvalidFormatType(format_type) => {
                write!(f, "Invalid format type: {}", format_type)
            }
            ProcessingError::InvalidLine(line) => {
                write!(f, "Invalid line: {} (lines are numbered from 1)", line)
            }
            ProcessingError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

/// Computed column of one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineIndent {
    /// 1-based line number
    pub line: usize,
    pub column: isize,
    pub current: usize,
}

/// Read a script from disk
pub fn read_source<P: AsRef<Path>>(file_path: P) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    fs::read_to_string(file_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ProcessingError::FileNotFound(file_path.display().to_string())
        }
        _ => ProcessingError::IoError(e.to_string()),
    })
}

/// Process a linker script file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    settings: &IndentSettings,
) -> Result<String, ProcessingError> {
    let content = read_source(&file_path)?;
    tracing::debug!(path = %file_path.as_ref().display(), spec = %spec, "processing file");
    process_source(&content, spec, settings)
}

/// Process script text according to the given specification
pub fn process_source(
    content: &str,
    spec: &ProcessingSpec,
    settings: &IndentSettings,
) -> Result<String, ProcessingError> {
    let document = Document::from_text(content);

    match spec.stage {
        ProcessingStage::Highlight => {
            let scanner = CommentScanner::new(&document);
            let lines: Vec<LineHighlights> = classify_document(&document, &scanner)
                .into_iter()
                .filter(|line| !line.highlights.is_empty())
                .collect();
            format_highlights(&document, &lines, &spec.format)
        }
        ProcessingStage::Indent => {
            let indents = line_indents(&document, settings);
            format_indents(&indents, &spec.format)
        }
        ProcessingStage::Reindent => {
            let mut document = document;
            reindent_document(&mut document, settings);
            Ok(document.to_text())
        }
    }
}

/// Decide the column of a single 1-based line of `content`
pub fn indent_at(
    content: &str,
    line_number: usize,
    settings: &IndentSettings,
) -> Result<IndentDecision, ProcessingError> {
    if line_number == 0 {
        return Err(ProcessingError::InvalidLine(line_number));
    }

    let document = Document::from_text(content);
    let scanner = CommentScanner::new(&document);
    Ok(decide_indent(&document, line_number - 1, settings, &scanner))
}

fn line_indents(document: &Document, settings: &IndentSettings) -> Vec<LineIndent> {
    let scanner = CommentScanner::new(document);
    (0..document.line_count())
        .map(|index| LineIndent {
            line: index + 1,
            column: decide_indent(document, index, settings, &scanner).column,
            current: document.indentation(index),
        })
        .collect()
}

fn format_highlights(
    document: &Document,
    lines: &[LineHighlights],
    format: &OutputFormat,
) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for line in lines {
                let text = document.line(line.line).unwrap_or("");
                for highlight in &line.highlights {
                    result.push_str(&format!(
                        "{}:{}-{} {} {}\n",
                        line.line + 1,
                        highlight.span.start,
                        highlight.span.end,
                        highlight.category,
                        &text[highlight.span.clone()]
                    ));
                }
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(lines)
            .map_err(|e| ProcessingError::IoError(e.to_string())),
    }
}

fn format_indents(indents: &[LineIndent], format: &OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for indent in indents {
                let marker = if indent.column == indent.current as isize {
                    ""
                } else {
                    " *"
                };
                result.push_str(&format!("{}: {}{}\n", indent.line, indent.column, marker));
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(indents)
            .map_err(|e| ProcessingError::IoError(e.to_string())),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .into_iter()
        .map(|spec| spec.to_string())
        .collect()
}

/// Sample sources module for accessing curated linker scripts
pub mod ld_sources {
    use super::*;

    /// Available sample files (canonical sources)
    pub const AVAILABLE_SAMPLES: &[&str] = &[
        "000-sections.ld",
        "010-memory.ld",
        "020-comments.ld",
        "030-sequential-blocks.ld",
        "040-discard.ld",
    ];

    /// Main interface for accessing sample scripts
    pub struct LdSources;

    impl LdSources {
        /// Get the full path to a sample file
        fn sample_path(filename: &str) -> String {
            format!("{}/samples/{}", env!("CARGO_MANIFEST_DIR"), filename)
        }

        /// Validate that a sample file exists and is available
        fn validate_sample(filename: &str) -> Result<(), ProcessingError> {
            if !AVAILABLE_SAMPLES.contains(&filename) {
                return Err(ProcessingError::FileNotFound(format!(
                    "Sample '{}' is not available. Available samples: {:?}",
                    filename, AVAILABLE_SAMPLES
                )));
            }
            Ok(())
        }

        /// Get sample content as raw string
        pub fn get_string(filename: &str) -> Result<String, ProcessingError> {
            Self::validate_sample(filename)?;
            read_source(Self::sample_path(filename))
        }

        /// Get sample content as a document
        pub fn get_document(filename: &str) -> Result<Document, ProcessingError> {
            Self::get_string(filename).map(|content| Document::from_text(&content))
        }

        /// Get sample content processed with the specified format and default settings
        pub fn get_processed(filename: &str, format: &str) -> Result<String, ProcessingError> {
            Self::validate_sample(filename)?;
            let spec = ProcessingSpec::from_string(format)?;
            process_file(
                Self::sample_path(filename),
                &spec,
                &IndentSettings::default(),
            )
        }

        /// List all available sample files
        pub fn list_samples() -> Vec<&'static str> {
            AVAILABLE_SAMPLES.to_vec()
        }
    }
}
