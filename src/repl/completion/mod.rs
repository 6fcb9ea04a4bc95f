//! Field completion for the query editor
//!
//! This module turns the field path produced by the annotator into
//! completion candidates.
//!
//! # Architecture
//!
//! - **suggest**: Prefix matching of the last path segment against the
//!   vocabulary (`object` fields first, then `file`)
//! - **Provider**: Fetches completion candidates for a field path
//! - **Engine**: Annotates the text before the cursor and computes the
//!   replacement span
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use mwql::repl::completion::CompletionEngine;
//! use mwql::vocabulary::FieldVocabulary;
//!
//! let engine = CompletionEngine::with_vocabulary(Arc::new(FieldVocabulary::builtin()));
//!
//! // Complete "tag:x AND md" with the cursor at the end
//! let (start, candidates) = engine.complete("tag:x AND md", 12);
//! assert_eq!(start, 10);
//! assert_eq!(candidates[0].replacement, "md5:");
//! ```

mod engine;
mod provider;
mod suggest;

pub use engine::{CompletionEngine, CompletionPair};
pub use provider::{CandidateProvider, VocabularyProvider};
pub use suggest::{FieldSuggestion, SUGGESTED_OBJECT_TYPES, suggest, suggest_fields};
