use serde::{Deserialize, Serialize};

use super::kinds::{ConfigError, MwqlError, QueryError, VocabularyError};

/// Structured error information for JSON output.
///
/// Printed wrapped in an `error` field when the output format is JSON, so
/// scripts driving `mwql annotate` or `mwql suggest` get a parseable failure.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    /// Byte offset into the query, for query errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl ErrorInfo {
    /// Convert error info to pretty-printed JSON wrapped in an `error` field.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&serde_json::json!({ "error": self }))
    }

    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&serde_json::json!({ "error": self }))
    }
}

impl From<&MwqlError> for ErrorInfo {
    fn from(error: &MwqlError) -> Self {
        let error_type = match error {
            MwqlError::Config(ConfigError::FileNotFound(_)) => "config.not_found",
            MwqlError::Config(_) => "config.invalid",
            MwqlError::Vocabulary(VocabularyError::FileNotFound(_)) => "vocabulary.not_found",
            MwqlError::Vocabulary(_) => "vocabulary.invalid",
            MwqlError::Query(QueryError::Empty) => "query.empty",
            MwqlError::Query(QueryError::Malformed { .. }) => "query.malformed",
            MwqlError::Io(_) => "io",
            MwqlError::Generic(_) => "generic",
        };

        let (message, offset) = match error {
            MwqlError::Query(QueryError::Malformed { offset, message }) => {
                (message.clone(), Some(*offset))
            }
            other => (other.to_string(), None),
        };

        Self {
            error_type: error_type.to_string(),
            message,
            offset,
        }
    }
}
