//! Error types for the term-shape row validator.
//!
//! Errors here describe failures to *acquire* or *tokenize* a table. A row
//! whose width differs from the expected field count is never an error; it is
//! reported through [`ValidationResult`](crate::core::ValidationResult).

use thiserror::Error;

/// The main error type for term-shape.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Error from I/O operations.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Error raised by the CSV tokenizer while reading a record.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "file", "memory", "s3")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from object storage operations.
    #[cfg(feature = "cloud-storage")]
    #[error("Object store error")]
    ObjectStore(#[from] object_store::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, ShapeError>`.
pub type Result<T> = std::result::Result<T, ShapeError>;

impl ShapeError {
    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns true if the tokenizer rejected the input (as opposed to the
    /// input being unreadable).
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::Csv(err) => !matches!(err.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<ShapeError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

fn wrap(msg: &str, err: ShapeError) -> ShapeError {
    use std::error::Error;

    if let ShapeError::Internal(inner) = err {
        return ShapeError::Internal(format!("{msg}: {inner}"));
    }

    let mut text = format!("{msg}: {err}");
    let mut cause = err.source();
    while let Some(inner) = cause {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        cause = inner.source();
    }
    ShapeError::Internal(text)
}
