//! Output formatting for mwql
//!
//! This module renders annotation results, suggestions, vocabulary listings
//! and errors in the configured output format:
//! - Shell format: the query painted with highlight styles
//! - JSON formatting (plain and pretty-printed)
//! - Table formatting
//!
//! It also owns the decoration mapping shared with the editor highlighter.

pub mod decoration;
mod json;
mod shell;
mod table;

pub use decoration::{StyleIntent, decoration_for};
pub use json::JsonFormatter;
pub use shell::ShellFormatter;
pub use table::{TableFormatter, TableStyle, format_field_path};

use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::{ErrorInfo, MwqlError, QueryError, Result};
use crate::parser::{AnnotatedQuery, annotate};
use crate::repl::completion::FieldSuggestion;
use crate::vocabulary::{FieldVocabulary, ObjectType};

/// Main formatter
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    /// Format an annotation result
    ///
    /// # Arguments
    /// * `annotated` - Result of annotating a query
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or serialization error
    pub fn format_annotated(&self, annotated: &AnnotatedQuery) -> Result<String> {
        match self.format_type {
            OutputFormat::Shell => Ok(self.shell().format_annotated(annotated)),
            OutputFormat::Json | OutputFormat::JsonPretty => self.json(annotated),
            OutputFormat::Table => Ok(self.table().format_annotations(annotated)),
        }
    }

    /// Format field suggestions
    pub fn format_suggestions(&self, suggestions: &[FieldSuggestion]) -> Result<String> {
        match self.format_type {
            OutputFormat::Shell => Ok(self.shell().format_suggestions(suggestions)),
            OutputFormat::Json | OutputFormat::JsonPretty => self.json(&suggestions),
            OutputFormat::Table => Ok(self.table().format_suggestions(suggestions)),
        }
    }

    /// Format the vocabulary, optionally one object type only
    pub fn format_fields(
        &self,
        vocabulary: &FieldVocabulary,
        object_type: Option<ObjectType>,
    ) -> Result<String> {
        match (self.format_type, object_type) {
            (OutputFormat::Json | OutputFormat::JsonPretty, Some(ty)) => {
                self.json(&vocabulary.fields(ty))
            }
            (OutputFormat::Json | OutputFormat::JsonPretty, None) => self.json(vocabulary),
            _ => Ok(self.table().format_fields(vocabulary, object_type)),
        }
    }

    /// Format a query accepted for submission
    pub fn format_submitted(&self, annotated: &AnnotatedQuery) -> Result<String> {
        match self.format_type {
            OutputFormat::Shell | OutputFormat::Table => {
                Ok(self.shell().paint_query(annotated))
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&serde_json::json!({ "query": annotated.text() }))
            }
        }
    }

    /// Format an error
    ///
    /// JSON formats get a structured `{"error": {...}}` object, everything
    /// else a single line of text.
    pub fn format_error(&self, error: &MwqlError) -> String {
        let info = ErrorInfo::from(error);
        let json = match self.format_type {
            OutputFormat::Json => info.to_json_compact().ok(),
            OutputFormat::JsonPretty => info.to_json().ok(),
            _ => None,
        };

        json.unwrap_or_else(|| self.shell().error_text(&error.to_string()))
    }

    /// Format a query refused at submission
    ///
    /// # Arguments
    /// * `query` - The submitted query, trimmed
    /// * `error` - Why it was refused
    pub fn format_rejected(&self, query: &str, error: &MwqlError) -> String {
        match (self.format_type, error) {
            (
                OutputFormat::Shell | OutputFormat::Table,
                MwqlError::Query(QueryError::Malformed { offset, message }),
            ) => {
                let shell = self.shell();
                [
                    shell.paint_query(&annotate(query)),
                    shell.caret_line(query, *offset),
                    shell.error_text(message),
                ]
                .join("\n")
            }
            _ => self.format_error(error),
        }
    }

    /// Set output format
    pub fn set_format(&mut self, format_type: OutputFormat) {
        self.format_type = format_type;
    }

    /// Enable or disable colors
    pub fn set_colors(&mut self, enabled: bool) {
        self.use_colors = enabled;
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<String> {
        let pretty = self.format_type == OutputFormat::JsonPretty;
        JsonFormatter::new(pretty, self.use_colors, 2).format(value)
    }

    fn shell(&self) -> ShellFormatter {
        ShellFormatter::new(self.use_colors)
    }

    fn table(&self) -> TableFormatter {
        TableFormatter::with_colors(self.use_colors)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::Shell, true)
    }
}
