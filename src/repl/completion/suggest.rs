//! Field suggestions for the path being typed
//!
//! Matching is flat: only the last segment of the path is compared, against
//! the top-level field names of the suggested object types. The earlier
//! segments do not narrow the candidates.

use serde::Serialize;

use crate::vocabulary::{FieldEntry, FieldVocabulary, ObjectType};

/// Object types consulted for suggestions, in output order
pub const SUGGESTED_OBJECT_TYPES: [ObjectType; 2] = [ObjectType::Object, ObjectType::File];

/// A matching field with its vocabulary metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSuggestion {
    pub name: String,
    pub description: String,
    pub object_type: ObjectType,
    pub has_subfields: bool,
    pub has_subquery: bool,
}

impl FieldSuggestion {
    fn new(object_type: ObjectType, field: &FieldEntry) -> Self {
        Self {
            name: field.name.clone(),
            description: field.description.clone(),
            object_type,
            has_subfields: field.has_subfields,
            has_subquery: field.has_subquery,
        }
    }

    /// Text inserted in place of the partial segment
    ///
    /// Names that are not plain terms are written as quoted field phrases.
    /// A separator follows: `.` for fields with subfields, `:` otherwise.
    pub fn replacement(&self) -> String {
        let name = if is_plain_term(&self.name) {
            self.name.clone()
        } else {
            serde_json::Value::String(self.name.clone()).to_string()
        };
        let separator = if self.has_subfields { '.' } else { ':' };
        format!("{name}{separator}")
    }
}

/// Names of fields matching the last path segment
///
/// # Arguments
/// * `current_field_path` - Field path from the annotator; the last element
///   is the (possibly empty) prefix being typed
/// * `vocabulary` - Field table to draw names from
///
/// # Returns
/// * `Vec<String>` - Matching names in vocabulary order, `object` fields first,
///   duplicates kept. Empty when the path is empty.
pub fn suggest(current_field_path: &[String], vocabulary: &FieldVocabulary) -> Vec<String> {
    suggest_fields(current_field_path, vocabulary)
        .into_iter()
        .map(|suggestion| suggestion.name)
        .collect()
}

/// Like [`suggest`], keeping descriptions and flags
pub fn suggest_fields(
    current_field_path: &[String],
    vocabulary: &FieldVocabulary,
) -> Vec<FieldSuggestion> {
    let Some(prefix) = current_field_path.last() else {
        return Vec::new();
    };

    SUGGESTED_OBJECT_TYPES
        .iter()
        .flat_map(|&object_type| {
            vocabulary
                .fields(object_type)
                .iter()
                .filter(|field| field.name.starts_with(prefix.as_str()))
                .map(move |field| FieldSuggestion::new(object_type, field))
        })
        .collect()
}

fn is_plain_term(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(name, "AND" | "OR" | "NOT" | "TO")
}
