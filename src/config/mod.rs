//! Configuration management for mwql
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. `RUST_LOG` (log filtering only)
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Field vocabulary configuration
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (shell, json, json-pretty, table)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,

    /// Enable syntax highlighting in the editor
    #[serde(default = "default_syntax_highlighting")]
    pub syntax_highlighting: bool,

    /// Show inline completion hints in the editor
    #[serde(default = "default_hints")]
    pub hints: bool,

    /// Prompt label
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Painted query with field path and error pointer
    Shell,

    /// Compact JSON format (single-line)
    ///
    /// Suitable for: logging, piping to other tools
    Json,

    /// Pretty-printed JSON format (multi-line)
    JsonPretty,

    /// Table format (ASCII table layout)
    Table,
}

/// Query history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Field vocabulary configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// TOML vocabulary file; the built-in MWDB table when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_format() -> OutputFormat {
    OutputFormat::Shell
}

fn default_color_output() -> bool {
    true
}

fn default_syntax_highlighting() -> bool {
    true
}

fn default_hints() -> bool {
    true
}

fn default_prompt() -> String {
    "mwql".to_string()
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mwql_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: default_color_output(),
            syntax_highlighting: default_syntax_highlighting(),
            hints: default_hints(),
            prompt: default_prompt(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from an explicit path or the default location
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the default configuration.
    ///
    /// # Arguments
    /// * `path` - Explicit configuration file, if any
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.mwql/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mwql")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.history.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.history.persist && self.history.file_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.file_path".to_string(),
                value: String::new(),
            }
            .into());
        }

        if self.display.prompt.contains('\n') {
            return Err(ConfigError::InvalidValue {
                field: "display.prompt".to_string(),
                value: self.display.prompt.clone(),
            }
            .into());
        }

        if let Some(file) = &self.vocabulary.file
            && file.as_os_str().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "vocabulary.file".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(())
    }

    /// Serialize the configuration as TOML with a comment per section
    pub fn to_toml_with_comments(&self) -> Result<String> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut output = String::new();
        for line in body.lines() {
            let comment = match line.trim() {
                "[display]" => Some("# Output and editor display"),
                "[history]" => Some("# Query history"),
                "[logging]" => Some("# Diagnostics written to stderr (RUST_LOG overrides the level)"),
                "[vocabulary]" => Some("# Field vocabulary; built-in MWDB fields when `file` is unset"),
                _ => None,
            };
            if let Some(comment) = comment {
                output.push_str(comment);
                output.push('\n');
            }
            output.push_str(line);
            output.push('\n');
        }
        Ok(output)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Check if format requires pretty printing
    pub fn is_pretty(&self) -> bool {
        matches!(self, OutputFormat::JsonPretty | OutputFormat::Table)
    }

    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.format, OutputFormat::Shell);
        assert!(config.display.color_output);
        assert_eq!(config.display.prompt, "mwql");
        assert!(config.vocabulary.file.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_output_format_checks() {
        assert!(OutputFormat::JsonPretty.is_pretty());
        assert!(OutputFormat::JsonPretty.is_json());
        assert!(!OutputFormat::Shell.is_pretty());
        assert!(OutputFormat::Table.is_pretty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [display]
            format = "json-pretty"

            [vocabulary]
            file = "/etc/mwql/fields.toml"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.format, OutputFormat::JsonPretty);
        assert!(config.display.hints);
        assert_eq!(config.history.max_size, 1000);
        assert_eq!(
            config.vocabulary.file,
            Some(PathBuf::from("/etc/mwql/fields.toml"))
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[display]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Invalid config format"));
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = Config::default();
        config.history.max_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = std::env::temp_dir().join("mwql-missing-config-file.toml");
        assert!(Config::load_from_file(Some(&path)).is_err());
    }

    #[test]
    fn test_roundtrip_with_comments() {
        let mut config = Config::default();
        config.logging.level = LogLevel::Debug;
        let text = config.to_toml_with_comments().unwrap();
        assert!(text.contains("# Query history\n[history]"));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("mwql-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[logging]\nlevel = \"trace\"\n").unwrap();
        let config = Config::load_from_file(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.logging.level.to_tracing_level(), tracing::Level::TRACE);
    }
}
