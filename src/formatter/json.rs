//! JSON formatting for annotations, suggestions and errors
//!
//! Compact JSON is left uncolored so it can be piped; pretty JSON is
//! colorized with `colored_json` when colors are enabled.

use colored_json::prelude::*;
use serde::Serialize;

use crate::error::Result;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Indentation level
    indent: usize,

    /// Enable colored output
    use_colors: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    /// * `use_colors` - Enable colored output
    /// * `indent` - Spaces per indentation level in pretty mode
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(pretty: bool, use_colors: bool, indent: usize) -> Self {
        Self {
            pretty,
            indent,
            use_colors,
        }
    }

    /// Serialize any value as JSON
    ///
    /// # Arguments
    /// * `value` - Value to format
    ///
    /// # Returns
    /// * `Result<String>` - JSON string or error
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let json_str = if self.pretty {
            self.to_pretty_string(value)?
        } else {
            serde_json::to_string(value)?
        };

        // Compact JSON should remain as-is for piping/logging
        if self.use_colors && self.pretty {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }

    /// Convert a value to pretty-printed JSON with custom indentation
    fn to_pretty_string<T: Serialize>(
        &self,
        value: &T,
    ) -> std::result::Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true, false, 2)
    }
}
