//! Completer for reedline - provides field name suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};

use super::completion::CompletionEngine;
use crate::vocabulary::FieldVocabulary;

/// Field name completer for reedline
pub struct QueryCompleter {
    /// Completion engine for field suggestions
    completion_engine: CompletionEngine,
}

impl QueryCompleter {
    /// Create a new query completer
    ///
    /// # Arguments
    /// * `vocabulary` - Field vocabulary shared with the rest of the editor
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(vocabulary: Arc<FieldVocabulary>) -> Self {
        Self {
            completion_engine: CompletionEngine::with_vocabulary(vocabulary),
        }
    }
}

impl Completer for QueryCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self.completion_engine.complete(line, pos);
        let end = pos.min(line.len());

        candidates
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: pair.description,
                style: None,
                extra: None,
                span: Span::new(start, end),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_completer() -> QueryCompleter {
        QueryCompleter::new(Arc::new(FieldVocabulary::builtin()))
    }

    #[test]
    fn test_complete_field_prefix() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("upl", 3);

        let values: Vec<_> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["uploader:", "upload_time:", "upload_count:"]);
    }

    #[test]
    fn test_complete_after_value_is_empty() {
        let mut completer = create_test_completer();
        assert!(completer.complete("tag:emo", 7).is_empty());
    }

    #[test]
    fn test_span_position() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("tag:x AND md", 12);

        assert!(!suggestions.is_empty());
        for suggestion in suggestions {
            assert_eq!(suggestion.span.start, 10);
            assert_eq!(suggestion.span.end, 12);
        }
    }

    #[test]
    fn test_description_carries_object_type() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("sha5", 4);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "sha512:");
        assert!(suggestions[0].description.as_deref().unwrap().starts_with("file"));
    }
}
