//! Candidate provider for field completion
//!
//! The engine asks a provider for the fields matching the current field
//! path. The default provider reads an immutable [`FieldVocabulary`].

use std::sync::Arc;

use super::suggest::{FieldSuggestion, suggest_fields};
use crate::vocabulary::FieldVocabulary;

/// Trait for providing completion candidates
pub trait CandidateProvider: Send + Sync {
    /// Fields matching the last segment of `current_field_path`
    fn fields(&self, current_field_path: &[String]) -> Vec<FieldSuggestion>;
}

/// Provider backed by a shared field vocabulary
#[derive(Debug, Clone)]
pub struct VocabularyProvider {
    vocabulary: Arc<FieldVocabulary>,
}

impl VocabularyProvider {
    pub fn new(vocabulary: Arc<FieldVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &FieldVocabulary {
        &self.vocabulary
    }
}

impl CandidateProvider for VocabularyProvider {
    fn fields(&self, current_field_path: &[String]) -> Vec<FieldSuggestion> {
        suggest_fields(current_field_path, &self.vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_delegates_to_vocabulary() {
        let provider = VocabularyProvider::new(Arc::new(FieldVocabulary::builtin()));
        let names: Vec<_> = provider
            .fields(&["sha".to_string()])
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["shared", "sha1", "sha256", "sha512"]);
        assert!(provider.fields(&[]).is_empty());
    }
}
