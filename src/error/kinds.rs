use std::{fmt, io};

/// Crate-wide `Result` type using [`MwqlError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MwqlError>;

/// Top-level error type for mwql.
#[derive(Debug)]
pub enum MwqlError {
    /// Configuration errors.
    Config(ConfigError),

    /// Field vocabulary errors.
    Vocabulary(VocabularyError),

    /// Rejected query.
    Query(QueryError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Field vocabulary errors.
#[derive(Debug)]
pub enum VocabularyError {
    /// Vocabulary file not found.
    FileNotFound(String),

    /// Vocabulary file is not valid TOML or has the wrong shape.
    InvalidFormat(String),

    /// A field without a name.
    EmptyName { object_type: String },

    /// The same field name listed twice for one object type.
    DuplicateField { object_type: String, name: String },

    /// Unknown object type name.
    UnknownObjectType(String),
}

/// Errors for queries that must be complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Nothing but whitespace.
    Empty,

    /// The query does not lex; `offset` is the byte where the error span starts.
    Malformed { offset: usize, message: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MwqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MwqlError::Config(e) => write!(f, "Configuration error: {e}"),
            MwqlError::Vocabulary(e) => write!(f, "Vocabulary error: {e}"),
            MwqlError::Query(e) => write!(f, "{e}"),
            MwqlError::Io(e) => write!(f, "I/O error: {e}"),
            MwqlError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyError::FileNotFound(path) => {
                write!(f, "Vocabulary file not found: {path}")
            }
            VocabularyError::InvalidFormat(msg) => write!(f, "Invalid vocabulary: {msg}"),
            VocabularyError::EmptyName { object_type } => {
                write!(f, "Field with empty name in '{object_type}'")
            }
            VocabularyError::DuplicateField { object_type, name } => {
                write!(f, "Field '{name}' listed twice in '{object_type}'")
            }
            VocabularyError::UnknownObjectType(name) => {
                write!(f, "Unknown object type: {name}")
            }
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Empty => write!(f, "Empty query"),
            QueryError::Malformed { offset, message } => {
                write!(f, "Malformed query at position {offset}: {message}")
            }
        }
    }
}

impl std::error::Error for MwqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MwqlError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for VocabularyError {}
impl std::error::Error for QueryError {}

/* ========================= Conversions to MwqlError ========================= */

impl From<io::Error> for MwqlError {
    fn from(err: io::Error) -> Self {
        MwqlError::Io(err)
    }
}

impl From<ConfigError> for MwqlError {
    fn from(err: ConfigError) -> Self {
        MwqlError::Config(err)
    }
}

impl From<VocabularyError> for MwqlError {
    fn from(err: VocabularyError) -> Self {
        MwqlError::Vocabulary(err)
    }
}

impl From<QueryError> for MwqlError {
    fn from(err: QueryError) -> Self {
        MwqlError::Query(err)
    }
}

impl From<serde_json::Error> for MwqlError {
    fn from(err: serde_json::Error) -> Self {
        MwqlError::Generic(format!("JSON serialization failed: {err}"))
    }
}

impl From<String> for MwqlError {
    fn from(msg: String) -> Self {
        MwqlError::Generic(msg)
    }
}

impl From<&str> for MwqlError {
    fn from(msg: &str) -> Self {
        MwqlError::Generic(msg.to_owned())
    }
}
