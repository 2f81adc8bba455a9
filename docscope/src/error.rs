//! Error types for docscope.
//!
//! All fallible operations return [`Result`], whose error type is
//! [`DocScopeError`]. Configuration errors are fatal and surfaced to the
//! caller; store failures inside time-windowed counts are recovered by the
//! analyzers themselves and never reach this type.

use thiserror::Error;

/// The main error type for docscope.
#[derive(Error, Debug)]
pub enum DocScopeError {
    /// Missing or invalid configuration, such as absent store credentials.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A read against the document store failed.
    #[error("Store error during {operation}: {message}")]
    Store {
        /// Store operation that failed (e.g. "count_documents")
        operation: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A range query needs an index the store does not have.
    #[error("Missing index on '{collection}.{field}'")]
    MissingIndex { collection: String, field: String },

    /// A collection or document path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable argument (empty collection name, bad path).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, DocScopeError>`.
pub type Result<T> = std::result::Result<T, DocScopeError>;

impl DocScopeError {
    /// Creates a store error for the given operation.
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying error.
    pub fn store_with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a missing-index error.
    pub fn missing_index(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingIndex {
            collection: collection.into(),
            field: field.into(),
        }
    }

    /// Returns true for configuration errors, which callers must not retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<serde_json::Error> for DocScopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
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
    E: Into<DocScopeError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| add_context(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| add_context(&f(), e.into()))
    }
}

fn add_context(msg: &str, err: DocScopeError) -> DocScopeError {
    match err {
        DocScopeError::Configuration(inner) => {
            DocScopeError::Configuration(format!("{msg}: {inner}"))
        }
        DocScopeError::Store {
            operation,
            message,
            source,
        } => DocScopeError::Store {
            operation,
            message: format!("{msg}: {message}"),
            source,
        },
        DocScopeError::NotFound(inner) => DocScopeError::NotFound(format!("{msg}: {inner}")),
        DocScopeError::InvalidInput(inner) => {
            DocScopeError::InvalidInput(format!("{msg}: {inner}"))
        }
        DocScopeError::Serialization(inner) => {
            DocScopeError::Serialization(format!("{msg}: {inner}"))
        }
        DocScopeError::Io(inner) => {
            DocScopeError::Io(std::io::Error::new(inner.kind(), format!("{msg}: {inner}")))
        }
        DocScopeError::Internal(inner) => DocScopeError::Internal(format!("{msg}: {inner}")),
        // the collection and field already identify the index
        missing @ DocScopeError::MissingIndex { .. } => missing,
    }
}
