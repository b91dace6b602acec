//! Error types for the Folio core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Folio.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Front matter block could not be parsed.
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// Document metadata was rejected by its collection schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Rejection of a document's metadata by a collection schema.
///
/// Both kinds carry the document's source identity and the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required field is absent.
    #[error("{source_id}: missing required field `{field}`")]
    MissingField { source_id: String, field: String },

    /// A field is present with the wrong type.
    #[error("{source_id}: field `{field}` expected {expected}, found {found}")]
    TypeMismatch {
        source_id: String,
        field: String,
        expected: String,
        found: ValueKind,
    },
}

impl SchemaError {
    /// Create a missing field error.
    pub fn missing(source_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            source_id: source_id.into(),
            field: field.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn mismatch(
        source_id: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: ValueKind,
    ) -> Self {
        Self::TypeMismatch {
            source_id: source_id.into(),
            field: field.into(),
            expected: expected.into(),
            found,
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }

    /// Identity of the rejected document.
    pub fn source_id(&self) -> &str {
        match self {
            Self::MissingField { source_id, .. } | Self::TypeMismatch { source_id, .. } => {
                source_id
            }
        }
    }

    /// Whether this is a missing field error.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// Whether this is a type mismatch error.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
