//! Error handling for mwql.
//!
//! This module provides:
//! - Application error kinds for configuration, vocabulary and query handling
//! - A structured error report for machine-readable output formats
//!
//! Lexing failures inside the editor are not errors in this sense: the
//! annotator turns them into an error span. [`QueryError`] is only raised when
//! a query has to be complete, e.g. on submission.
//!
//! # Example
//!
//! ```rust
//! use mwql::error::{MwqlError, QueryError, Result};
//!
//! fn submit(line: &str) -> Result<()> {
//!     if line.trim().is_empty() {
//!         return Err(QueryError::Empty.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(submit(""), Err(MwqlError::Query(QueryError::Empty))));
//! ```

pub mod kinds;
pub mod report;

// Re-export commonly used types
pub use kinds::{ConfigError, MwqlError, QueryError, Result, VocabularyError};
pub use report::ErrorInfo;
