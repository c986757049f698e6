//! ldmode settings
//!
//! The indentation unit, the brace detection mode and the file association of the mode all
//! come from here. `defaults/ldmode.default.toml` is compiled in and is the only required
//! source; [`Loader`] stacks files and single-key overrides on top of it and produces an
//! [`LdModeConfig`]. Callers read the settings again for every computation, so a rebuilt
//! configuration applies from the next call on.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::ldscript::indentation::{BraceDetection, IndentSettings};

const DEFAULT_TOML: &str = include_str!("../defaults/ldmode.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LdModeConfig {
    pub indent: IndentConfig,
    pub mode: ModeConfig,
}

/// Knobs read by every indentation computation
#[derive(Debug, Clone, Deserialize)]
pub struct IndentConfig {
    pub unit: usize,
    pub brace_detection: BraceDetection,
}

/// How the mode presents itself to a host editor
#[derive(Debug, Clone, Deserialize)]
pub struct ModeConfig {
    pub name: String,
    pub extensions: Vec<String>,
    pub electric_chars: Vec<char>,
}

impl From<&IndentConfig> for IndentSettings {
    fn from(config: &IndentConfig) -> Self {
        IndentSettings {
            unit: config.unit,
            brace_detection: config.brace_detection,
        }
    }
}

impl LdModeConfig {
    pub fn indent_settings(&self) -> IndentSettings {
        IndentSettings::from(&self.indent)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.indent.unit == 0 {
            return Err(ConfigError::Message(
                "indent.unit must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Stacks configuration sources for ldmode.
///
/// The embedded defaults sit at the bottom; each file or override added later wins over
/// what is below it.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Add a TOML file that is skipped when absent, such as a per-user settings file
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        tracing::debug!(path = %path.display(), required, "adding configuration file");
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `indent.unit`, above every file
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge all layers and check the result
    pub fn build(self) -> Result<LdModeConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<LdModeConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in configuration with nothing layered on top
pub fn load_defaults() -> Result<LdModeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.indent.unit, 4);
        assert_eq!(config.indent.brace_detection, BraceDetection::Raw);
        assert_eq!(config.mode.name, "ld-script");
        assert_eq!(config.mode.extensions, vec!["ld".to_string()]);
        assert_eq!(config.mode.electric_chars, vec!['{', '}']);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("indent.brace_detection", "comment-aware")
            .expect("override to apply")
            .set_override("indent.unit", 2_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(
            config.indent_settings(),
            IndentSettings {
                unit: 2,
                brace_detection: BraceDetection::CommentAware,
            }
        );
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[indent]\nunit = 8\n\n[mode]\nextensions = [\"ld\", \"lds\"]")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.indent.unit, 8);
        assert_eq!(config.indent.brace_detection, BraceDetection::Raw);
        assert_eq!(config.mode.extensions, vec!["ld", "lds"]);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/ldmode.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.indent.unit, 4);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(Loader::new()
            .with_file("/nonexistent/ldmode.toml")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_zero_unit() {
        let result = Loader::new()
            .set_override("indent.unit", 0_i64)
            .expect("override to apply")
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::Message(message)) if message.contains("indent.unit")
        ));
    }

    #[test]
    fn later_layers_win() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[indent]\nunit = 8").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .set_override("indent.unit", 3_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.indent.unit, 3);
    }
}
