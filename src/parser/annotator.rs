//! Query annotator
//!
//! Turns the token stream of a query into annotations for highlighting and
//! extracts the field path the user is in the middle of typing. The whole
//! query is re-annotated from scratch on every change; there is no state
//! carried between calls.

use serde::{Deserialize, Serialize};

use super::query_lexer::{QueryTokenizer, Tokenizer};
use super::token::{CategoryRole, CategorySet, Token, TokenCategory};

/// A token plus the presentation metadata the annotator attaches to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(flatten)]
    pub token: Token,

    /// Set on the group-open annotation that new input would land in
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_innermost_open_bracket: bool,

    /// Present on the trailing error span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Annotation {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            is_innermost_open_bracket: false,
            error_message: None,
        }
    }

    /// Error span covering everything from `offset` on
    pub fn error(value: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self {
            token: Token::new(TokenCategory::Error, value, offset),
            is_innermost_open_bracket: false,
            error_message: Some(message.into()),
        }
    }

    pub fn category(&self) -> TokenCategory {
        self.token.category
    }

    pub fn value(&self) -> &str {
        &self.token.value
    }

    pub fn offset(&self) -> usize {
        self.token.offset
    }

    pub fn is_error(&self) -> bool {
        self.token.category == TokenCategory::Error
    }
}

/// Result of one annotation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedQuery {
    pub annotations: Vec<Annotation>,
    /// Decoded segments of the field reference being typed
    pub current_field_path: Vec<String>,
}

impl AnnotatedQuery {
    /// The trailing error span, if the query failed to lex
    pub fn error(&self) -> Option<&Annotation> {
        self.annotations.last().filter(|annotation| annotation.is_error())
    }

    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// Concatenation of all annotation values
    pub fn text(&self) -> String {
        self.annotations
            .iter()
            .map(|annotation| annotation.value())
            .collect()
    }
}

/// Annotator over an arbitrary tokenizer
#[derive(Debug, Clone, Default)]
pub struct Annotator<T = QueryTokenizer> {
    tokenizer: T,
}

impl<T: Tokenizer> Annotator<T> {
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// Annotate a complete query string
    ///
    /// Never fails: a lexing failure becomes a single `error` annotation
    /// spanning from the last good position to the end of the query.
    pub fn annotate(&self, query: &str) -> AnnotatedQuery {
        let mut annotations: Vec<Annotation> = Vec::new();
        let mut bracket_stack: Vec<usize> = Vec::new();
        let mut field_path: Vec<String> = Vec::new();
        let mut cursor = 0;

        let valid_next = if query.is_empty() {
            self.tokenizer.start_categories()
        } else {
            let mut valid_next = CategorySet::new();

            for item in self.tokenizer.tokenize(query) {
                let lexeme = match item {
                    Ok(lexeme) => lexeme,
                    Err(err) => {
                        tracing::debug!(offset = err.offset, cursor, "query lexing failed: {err}");
                        let tail = query.get(cursor..).unwrap_or_default();
                        annotations.push(Annotation::error(tail, cursor, err.message));
                        field_path.clear();
                        break;
                    }
                };

                let mut annotation = Annotation::new(lexeme.token);
                match annotation.category().role() {
                    CategoryRole::GroupOpen => {
                        if let Some(&top) = bracket_stack.last() {
                            annotations[top].is_innermost_open_bracket = false;
                        }
                        annotation.is_innermost_open_bracket = true;
                        bracket_stack.push(annotations.len());
                    }
                    CategoryRole::GroupClose => {
                        bracket_stack.pop();
                        if let Some(&top) = bracket_stack.last() {
                            annotations[top].is_innermost_open_bracket = true;
                        }
                    }
                    CategoryRole::FieldName => {
                        field_path.push(decode_segment(&annotation.token));
                    }
                    CategoryRole::FieldContinuation => {}
                    CategoryRole::Other => field_path.clear(),
                }

                cursor = annotation.token.end();
                annotations.push(annotation);
                valid_next = lexeme.valid_next;
            }

            valid_next
        };

        if valid_next.accepts_field_name() {
            field_path.push(String::new());
        } else if !annotations
            .last()
            .is_some_and(|annotation| annotation.category().is_field_name())
        {
            field_path.clear();
        }

        tracing::trace!(
            annotations = annotations.len(),
            field_path = ?field_path,
            "annotated query"
        );

        AnnotatedQuery {
            annotations,
            current_field_path: field_path,
        }
    }
}

/// Annotate with the MWDB query tokenizer
pub fn annotate(query: &str) -> AnnotatedQuery {
    Annotator::new(QueryTokenizer).annotate(query)
}

/// Decoded text of a field name token
fn decode_segment(token: &Token) -> String {
    if token.category != TokenCategory::FieldPhrase {
        return token.value.clone();
    }

    match serde_json::from_str::<String>(&token.value) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(
                offset = token.offset,
                "undecodable field phrase {:?}: {err}",
                token.value
            );
            token.value.clone()
        }
    }
}
