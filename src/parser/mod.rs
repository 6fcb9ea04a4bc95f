//! Query annotation for the MWDB search language
//!
//! This module turns raw query text into classified spans for highlighting and
//! extracts the field path the user is typing, without requiring the query to
//! be well formed.
//!
//! # Architecture
//!
//! The parser is split into multiple focused modules:
//! - `token`: Token categories, roles and category sets
//! - `query_lexer`: The `Tokenizer` contract and the MWDB query lexer
//! - `annotator`: Bracket tracking, error spans and field path extraction
//!
//! # Examples
//!
//! ```
//! use mwql::parser::annotate;
//!
//! let result = annotate("(tag:emotet OR cfg.ur");
//! assert_eq!(result.current_field_path, vec!["cfg", "ur"]);
//! assert!(result.annotations[0].is_innermost_open_bracket);
//! ```

mod annotator;
mod query_lexer;
mod token;

// Re-export public API
pub use annotator::{AnnotatedQuery, Annotation, Annotator, annotate};
pub use query_lexer::{
    LexError, LexResult, Lexeme, QueryLexer, QueryTokenizer, START_PROBE, Tokenizer,
};
pub use token::{CategoryRole, CategorySet, Token, TokenCategory};

use crate::error::{QueryError, Result};

/// Strict front end over the annotator
///
/// The annotator tolerates anything; this parser is used where a query has to
/// be complete, such as when the user submits a line.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    annotator: Annotator,
}

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete query
    ///
    /// # Arguments
    ///
    /// * `input` - The query text; surrounding whitespace is ignored
    ///
    /// # Returns
    ///
    /// * `Result<AnnotatedQuery>` - Annotations of the trimmed query, or
    ///   `QueryError::Empty` / `QueryError::Malformed` with the failing offset
    pub fn parse(&self, input: &str) -> Result<AnnotatedQuery> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty.into());
        }

        let annotated = self.annotator.annotate(trimmed);
        if let Some(error) = annotated.error() {
            return Err(QueryError::Malformed {
                offset: error.offset(),
                message: error.error_message.clone().unwrap_or_default(),
            }
            .into());
        }

        Ok(annotated)
    }
}

#[cfg(test)]
mod tests;
