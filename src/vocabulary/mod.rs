//! Field vocabulary of the query language
//!
//! The vocabulary lists, per object type, the field names a query may
//! reference. It is loaded once at startup, either from the built-in MWDB
//! table or from a TOML file:
//!
//! ```toml
//! [[object]]
//! name = "tag"
//! description = "Tag attached to the object"
//!
//! [[config]]
//! name = "cfg"
//! description = "Configuration contents"
//! has_subfields = true
//! ```
//!
//! Field order within an object type is significant: suggestions are
//! offered in that order.

mod builtin;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VocabularyError};

/// Object types that carry their own field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Object,
    File,
    Config,
    TextBlob,
}

impl ObjectType {
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Object,
        ObjectType::File,
        ObjectType::Config,
        ObjectType::TextBlob,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Object => "object",
            ObjectType::File => "file",
            ObjectType::Config => "config",
            ObjectType::TextBlob => "text_blob",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = VocabularyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "object" => Ok(ObjectType::Object),
            "file" => Ok(ObjectType::File),
            "config" => Ok(ObjectType::Config),
            "text_blob" | "blob" => Ok(ObjectType::TextBlob),
            _ => Err(VocabularyError::UnknownObjectType(s.to_string())),
        }
    }
}

/// A searchable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Field accepts a dotted key path after it (`attribute.key`)
    #[serde(default)]
    pub has_subfields: bool,

    /// Field value is itself a query (`parent:(tag:x)`)
    #[serde(default)]
    pub has_subquery: bool,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            has_subfields: false,
            has_subquery: false,
        }
    }

    pub fn with_subfields(mut self) -> Self {
        self.has_subfields = true;
        self
    }

    pub fn with_subquery(mut self) -> Self {
        self.has_subquery = true;
        self
    }
}

/// Immutable field table keyed by object type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVocabulary {
    #[serde(default)]
    object: Vec<FieldEntry>,
    #[serde(default)]
    file: Vec<FieldEntry>,
    #[serde(default)]
    config: Vec<FieldEntry>,
    #[serde(default)]
    text_blob: Vec<FieldEntry>,
}

impl FieldVocabulary {
    /// Empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields of a stock MWDB instance
    pub fn builtin() -> Self {
        Self {
            object: builtin::object(),
            file: builtin::file(),
            config: builtin::config(),
            text_blob: builtin::text_blob(),
        }
    }

    /// Replace the field list of one object type
    pub fn with_fields(mut self, object_type: ObjectType, fields: Vec<FieldEntry>) -> Self {
        *self.fields_mut(object_type) = fields;
        self
    }

    /// Parse and validate a TOML vocabulary
    ///
    /// # Arguments
    /// * `content` - TOML text with `[[object]]`, `[[file]]`, `[[config]]`
    ///   and `[[text_blob]]` arrays
    ///
    /// # Returns
    /// * `Result<FieldVocabulary>` - The vocabulary or a format/validation error
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let vocabulary: FieldVocabulary = toml::from_str(content)
            .map_err(|e| VocabularyError::InvalidFormat(e.to_string()))?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Load and validate a TOML vocabulary file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VocabularyError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            fields = vocabulary.len(),
            "loaded field vocabulary"
        );
        Ok(vocabulary)
    }

    /// Load from a file if one is given, otherwise use the built-in table
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Check that every name is non-empty and unique within its object type
    pub fn validate(&self) -> Result<()> {
        for object_type in ObjectType::ALL {
            let mut seen = HashSet::new();
            for field in self.fields(object_type) {
                if field.name.trim().is_empty() {
                    return Err(VocabularyError::EmptyName {
                        object_type: object_type.to_string(),
                    }
                    .into());
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(VocabularyError::DuplicateField {
                        object_type: object_type.to_string(),
                        name: field.name.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Fields of one object type, in declaration order
    pub fn fields(&self, object_type: ObjectType) -> &[FieldEntry] {
        match object_type {
            ObjectType::Object => &self.object,
            ObjectType::File => &self.file,
            ObjectType::Config => &self.config,
            ObjectType::TextBlob => &self.text_blob,
        }
    }

    fn fields_mut(&mut self, object_type: ObjectType) -> &mut Vec<FieldEntry> {
        match object_type {
            ObjectType::Object => &mut self.object,
            ObjectType::File => &mut self.file,
            ObjectType::Config => &mut self.config,
            ObjectType::TextBlob => &mut self.text_blob,
        }
    }

    /// All fields with their object type, grouped by type
    pub fn iter(&self) -> impl Iterator<Item = (ObjectType, &FieldEntry)> + '_ {
        ObjectType::ALL.into_iter().flat_map(move |object_type| {
            self.fields(object_type)
                .iter()
                .map(move |field| (object_type, field))
        })
    }

    /// Look a field up by exact name
    pub fn find(&self, object_type: ObjectType, name: &str) -> Option<&FieldEntry> {
        self.fields(object_type)
            .iter()
            .find(|field| field.name == name)
    }

    /// Total number of fields
    pub fn len(&self) -> usize {
        ObjectType::ALL
            .iter()
            .map(|&object_type| self.fields(object_type).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let vocabulary = FieldVocabulary::builtin();
        vocabulary.validate().unwrap();
        assert_eq!(vocabulary.fields(ObjectType::Object)[0].name, "dhash");
        assert!(vocabulary.find(ObjectType::Config, "cfg").unwrap().has_subfields);
        assert!(vocabulary.find(ObjectType::Object, "parent").unwrap().has_subquery);
        assert!(!vocabulary.is_empty());
    }

    #[test]
    fn test_from_toml_keeps_order() {
        let vocabulary = FieldVocabulary::from_toml_str(
            r#"
            [[object]]
            name = "tag"
            description = "Tag"

            [[object]]
            name = "attribute"
            has_subfields = true

            [[file]]
            name = "size"
            "#,
        )
        .unwrap();

        let names: Vec<_> = vocabulary
            .fields(ObjectType::Object)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["tag", "attribute"]);
        assert!(vocabulary.fields(ObjectType::Object)[1].has_subfields);
        assert_eq!(vocabulary.fields(ObjectType::Object)[1].description, "");
        assert!(vocabulary.fields(ObjectType::TextBlob).is_empty());
        assert_eq!(vocabulary.len(), 3);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = FieldVocabulary::from_toml_str(
            r#"
            [[file]]
            name = "size"
            [[file]]
            name = "size"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'size' listed twice in 'file'"));
    }

    #[test]
    fn test_same_name_in_different_types_allowed() {
        let vocabulary = FieldVocabulary::new()
            .with_fields(ObjectType::File, vec![FieldEntry::new("type", "")])
            .with_fields(ObjectType::Config, vec![FieldEntry::new("type", "")]);
        vocabulary.validate().unwrap();
    }

    #[test]
    fn test_empty_name_rejected() {
        let vocabulary =
            FieldVocabulary::new().with_fields(ObjectType::Object, vec![FieldEntry::new(" ", "")]);
        assert!(vocabulary.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = FieldVocabulary::from_toml_str("[[object]]\nname = 5\n").unwrap_err();
        assert!(err.to_string().starts_with("Vocabulary error: Invalid vocabulary"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("mwql-vocab-{}.toml", std::process::id()));
        std::fs::write(&path, "[[text_blob]]\nname = \"content\"\n").unwrap();
        let vocabulary = FieldVocabulary::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(vocabulary.fields(ObjectType::TextBlob).len(), 1);

        assert!(FieldVocabulary::from_file(&path).is_err());
    }

    #[test]
    fn test_object_type_parsing() {
        assert_eq!("text-blob".parse::<ObjectType>().unwrap(), ObjectType::TextBlob);
        assert_eq!("FILE".parse::<ObjectType>().unwrap(), ObjectType::File);
        assert!("sample".parse::<ObjectType>().is_err());
    }

    #[test]
    fn test_iter_groups_by_type() {
        let vocabulary = FieldVocabulary::builtin();
        let first_file = vocabulary
            .iter()
            .position(|(object_type, _)| object_type == ObjectType::File)
            .unwrap();
        assert_eq!(first_file, vocabulary.fields(ObjectType::Object).len());
    }
}
