//! Interactive query editor
//!
//! This module provides the line editor the query is typed into:
//! - Syntax highlighting recomputed on every keystroke
//! - Field name completion in a columnar menu bound to Tab
//! - Inline hints from the first matching field or from history
//! - Query history, optionally persisted to a file
//! - Submission gating: malformed queries are rejected with their error

pub mod completion;

mod completer;
mod engine;
mod highlighter;
mod hinter;
mod prompt;

pub use completer::QueryCompleter;
pub use engine::{ReplEngine, ReplInput};
pub use highlighter::QueryHighlighter;
pub use hinter::QueryHinter;
pub use prompt::QueryPrompt;
