//! MWDB Query Editor Library
//!
//! This library provides live annotation and field completion for the MWDB
//! search query language, a Lucene-like syntax of `field:value` terms,
//! groups, ranges and boolean operators. It can be used on its own to
//! highlight or complete queries in any editor.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and the decoration mapping
//! - `parser`: Query tokenizer and annotator
//! - `repl`: Interactive query editor and field completion
//! - `vocabulary`: Field vocabulary per object type
//!
//! # Example
//!
//! ```
//! use mwql::{FieldVocabulary, annotate, repl::completion::suggest};
//!
//! let vocabulary = FieldVocabulary::builtin();
//! let annotated = annotate("tag:emotet AND upl");
//!
//! assert_eq!(annotated.current_field_path, vec!["upl"]);
//! assert_eq!(
//!     suggest(&annotated.current_field_path, &vocabulary),
//!     vec!["uploader", "upload_time", "upload_count"]
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod repl;
pub mod vocabulary;

// Re-export commonly used types
pub use config::Config;
pub use error::{MwqlError, Result};
pub use formatter::Formatter;
pub use parser::{AnnotatedQuery, Annotation, Parser, annotate};
pub use repl::{ReplEngine, ReplInput};
pub use vocabulary::FieldVocabulary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
