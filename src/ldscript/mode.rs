//! Mode descriptor handed to a host editor
//!
//! A host registers editing modes through [ModeRegistry]. The linker script mode is a plain
//! value built once from configuration with [ModeDescriptor::ld_script]; nothing is kept in
//! process-wide state.

use std::collections::HashMap;
use std::path::Path;

use crate::config::LdModeConfig;
use crate::ldscript::comments::CommentScanner;
use crate::ldscript::document::Document;
use crate::ldscript::highlight::{classify_line, Highlights, HighlightRule, HIGHLIGHT_RULES};
use crate::ldscript::indentation::{compute_indent, IndentSettings};

/// Everything a host needs to provide linker script editing support
#[derive(Debug, Clone)]
pub struct ModeDescriptor {
    pub name: String,
    /// Extensions without the leading dot
    pub file_extensions: Vec<String>,
    pub indent: IndentSettings,
    /// Characters that trigger reindentation of the current line when typed
    pub electric_chars: Vec<char>,
    pub highlight_rules: &'static [HighlightRule],
}

impl ModeDescriptor {
    /// Build the linker script mode from configuration
    pub fn ld_script(config: &LdModeConfig) -> Self {
        ModeDescriptor {
            name: config.mode.name.clone(),
            file_extensions: config
                .mode
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            indent: config.indent_settings(),
            electric_chars: config.mode.electric_chars.clone(),
            highlight_rules: HIGHLIGHT_RULES.as_slice(),
        }
    }

    /// Whether this mode handles files with the given path
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.file_extensions.iter().any(|known| known == ext))
    }

    /// Whether typing `ch` should reindent the current line
    pub fn is_electric(&self, ch: char) -> bool {
        self.electric_chars.contains(&ch)
    }

    /// Indentation column for `line`, using this mode's settings
    pub fn indent_for(&self, document: &Document, line: usize) -> isize {
        let scanner = CommentScanner::new(document);
        compute_indent(document, line, &self.indent, &scanner)
    }

    /// Highlight spans for one line
    pub fn highlight(&self, line: &str) -> Highlights {
        classify_line(line)
    }
}

/// Host-side registration of editing modes
pub trait ModeRegistry {
    /// Register a mode. A mode with the same name is replaced.
    fn register_mode(&mut self, mode: ModeDescriptor);
}

/// In-memory mode registry
#[derive(Debug, Default)]
pub struct ModeTable {
    modes: HashMap<String, ModeDescriptor>,
}

impl ModeTable {
    pub fn new() -> Self {
        ModeTable {
            modes: HashMap::new(),
        }
    }

    /// Get a mode by name
    pub fn get(&self, name: &str) -> Option<&ModeDescriptor> {
        self.modes.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// List all modes (sorted by name)
    pub fn list_all(&self) -> Vec<&ModeDescriptor> {
        let mut modes: Vec<_> = self.modes.values().collect();
        modes.sort_by(|a, b| a.name.cmp(&b.name));
        modes
    }

    /// Find the mode associated with a file
    pub fn mode_for_path(&self, path: impl AsRef<Path>) -> Option<&ModeDescriptor> {
        let path = path.as_ref();
        self.list_all()
            .into_iter()
            .find(|mode| mode.matches_path(path))
    }
}

impl ModeRegistry for ModeTable {
    fn register_mode(&mut self, mode: ModeDescriptor) {
        self.modes.insert(mode.name.clone(), mode);
    }
}
