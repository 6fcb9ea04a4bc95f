//! Completion engine - orchestrates the completion flow
//!
//! The engine annotates the text before the cursor, asks the provider for
//! fields matching the current field path and works out which part of the
//! line a chosen candidate replaces.

use std::sync::Arc;

use super::provider::{CandidateProvider, VocabularyProvider};
use crate::parser::{AnnotatedQuery, Annotator};
use crate::vocabulary::FieldVocabulary;

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    /// Optional description for the candidate
    pub description: Option<String>,
}

/// Main completion engine
pub struct CompletionEngine {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn CandidateProvider>,
    annotator: Annotator,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    pub fn new(provider: Arc<dyn CandidateProvider>) -> Self {
        Self {
            provider,
            annotator: Annotator::default(),
        }
    }

    /// Engine over a shared vocabulary
    pub fn with_vocabulary(vocabulary: Arc<FieldVocabulary>) -> Self {
        Self::new(Arc::new(VocabularyProvider::new(vocabulary)))
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `(usize, Vec<CompletionPair>)` - Completion start position and candidate pairs
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let pos = pos.min(line.len());
        let Some(before_cursor) = line.get(..pos) else {
            return (pos, Vec::new());
        };

        let annotated = self.annotator.annotate(before_cursor);
        let start = Self::completion_start(&annotated, pos);

        let pairs: Vec<CompletionPair> = self
            .provider
            .fields(&annotated.current_field_path)
            .into_iter()
            .map(|suggestion| CompletionPair {
                replacement: suggestion.replacement(),
                description: Some(if suggestion.description.is_empty() {
                    suggestion.object_type.to_string()
                } else {
                    format!("{}: {}", suggestion.object_type, suggestion.description)
                }),
                display: suggestion.name,
            })
            .collect();

        tracing::trace!(pos, start, candidates = pairs.len(), "completion");
        (start, pairs)
    }

    /// Start of the partial field segment ending at the cursor, or the cursor
    fn completion_start(annotated: &AnnotatedQuery, pos: usize) -> usize {
        annotated
            .annotations
            .last()
            .filter(|annotation| {
                annotation.category().is_field_name() && annotation.token.end() == pos
            })
            .map(|annotation| annotation.offset())
            .unwrap_or(pos)
    }
}
