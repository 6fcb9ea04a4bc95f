//! Token model for the MWDB query language
//!
//! Tokens are produced by a [`Tokenizer`](super::Tokenizer) and consumed by the
//! [`Annotator`](super::Annotator). Every category belongs to exactly one
//! [`CategoryRole`], which is what the annotator dispatches on.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Token categories of the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenCategory {
    /// Opening parenthesis of an expression group: `(tag:a OR tag:b)`
    ExprGroupOpen,
    /// Opening parenthesis of a value group: `tag:(a OR b)`
    ValueGroupOpen,
    /// Opening bracket of a range: `size:[1 TO 5}`
    ValueRangeOpen,
    /// Closing parenthesis of an expression or value group
    ExprGroupClose,
    /// Closing bracket of a range
    RangeClose,
    /// Quoted, JSON-escaped field name segment
    FieldPhrase,
    /// Bare field name segment
    FieldTerm,
    /// Array marker following a field segment: `cfg.urls*`
    FieldArrayMarker,
    /// Dot between field segments
    FieldSeparator,
    /// Colon between a field reference and its value
    FieldValueSeparator,
    /// `NOT` or a leading `-`
    Negation,
    /// `AND` / `OR`
    BooleanOperator,
    /// `TO` inside a range
    RangeOperator,
    /// `>`, `>=`, `<`, `<=`
    ComparisonOperator,
    /// Quoted value
    ValuePhrase,
    /// Bare value, possibly containing wildcards
    ValueTerm,
    /// Numeric value
    ValueNumber,
    /// Run of whitespace
    Whitespace,
    /// Unparseable tail of the query. Never produced by a tokenizer.
    Error,
}

/// Role of a category, as seen by the annotator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRole {
    /// Opens a group; pushed on the bracket stack
    GroupOpen,
    /// Closes a group; pops the bracket stack
    GroupClose,
    /// Contributes a segment to the field path
    FieldName,
    /// Structural glue inside a field reference
    FieldContinuation,
    /// Anything else; resets the field path
    Other,
}

impl TokenCategory {
    /// All categories a tokenizer may produce
    pub const LEXICAL: [TokenCategory; 18] = [
        TokenCategory::ExprGroupOpen,
        TokenCategory::ValueGroupOpen,
        TokenCategory::ValueRangeOpen,
        TokenCategory::ExprGroupClose,
        TokenCategory::RangeClose,
        TokenCategory::FieldPhrase,
        TokenCategory::FieldTerm,
        TokenCategory::FieldArrayMarker,
        TokenCategory::FieldSeparator,
        TokenCategory::FieldValueSeparator,
        TokenCategory::Negation,
        TokenCategory::BooleanOperator,
        TokenCategory::RangeOperator,
        TokenCategory::ComparisonOperator,
        TokenCategory::ValuePhrase,
        TokenCategory::ValueTerm,
        TokenCategory::ValueNumber,
        TokenCategory::Whitespace,
    ];

    pub fn role(self) -> CategoryRole {
        use TokenCategory::*;

        match self {
            ExprGroupOpen | ValueGroupOpen | ValueRangeOpen => CategoryRole::GroupOpen,
            ExprGroupClose | RangeClose => CategoryRole::GroupClose,
            FieldPhrase | FieldTerm => CategoryRole::FieldName,
            FieldArrayMarker | FieldSeparator => CategoryRole::FieldContinuation,
            _ => CategoryRole::Other,
        }
    }

    pub fn is_field_name(self) -> bool {
        self.role() == CategoryRole::FieldName
    }

    /// Negation, boolean, range and comparison operators
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenCategory::Negation
                | TokenCategory::BooleanOperator
                | TokenCategory::RangeOperator
                | TokenCategory::ComparisonOperator
        )
    }

    pub fn is_literal_phrase(self) -> bool {
        self == TokenCategory::ValuePhrase
    }

    /// Category name as used in serialized output
    pub fn as_str(self) -> &'static str {
        use TokenCategory::*;

        match self {
            ExprGroupOpen => "expr-group-open",
            ValueGroupOpen => "value-group-open",
            ValueRangeOpen => "value-range-open",
            ExprGroupClose => "expr-group-close",
            RangeClose => "range-close",
            FieldPhrase => "field-phrase",
            FieldTerm => "field-term",
            FieldArrayMarker => "field-array-marker",
            FieldSeparator => "field-separator",
            FieldValueSeparator => "field-value-separator",
            Negation => "negation",
            BooleanOperator => "boolean-operator",
            RangeOperator => "range-operator",
            ComparisonOperator => "comparison-operator",
            ValuePhrase => "value-phrase",
            ValueTerm => "value-term",
            ValueNumber => "value-number",
            Whitespace => "whitespace",
            Error => "error",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified span of the query text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub value: String,
    /// Byte offset of the first character in the original string
    pub offset: usize,
}

impl Token {
    pub fn new(category: TokenCategory, value: impl Into<String>, offset: usize) -> Self {
        Self {
            category,
            value: value.into(),
            offset,
        }
    }

    /// Byte offset just past the token
    pub fn end(&self) -> usize {
        self.offset + self.value.len()
    }
}

/// Set of categories that are valid at some position of the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<TokenCategory>);

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: TokenCategory) {
        self.0.insert(category);
    }

    pub fn contains(&self, category: TokenCategory) -> bool {
        self.0.contains(&category)
    }

    /// Whether a field name segment may start here
    pub fn accepts_field_name(&self) -> bool {
        self.0.iter().any(|category| category.is_field_name())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenCategory> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TokenCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = TokenCategory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[TokenCategory; N]> for CategorySet {
    fn from(categories: [TokenCategory; N]) -> Self {
        categories.into_iter().collect()
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(TokenCategory::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}
