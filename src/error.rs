//! Error types for `pocket_tasks`.

/// Errors that can occur in the task store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input to a create or update operation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation referenced a task id that does not exist.
    #[error("task not found: {0}")]
    NotFound(String),

    /// An I/O error occurred in the storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The storage backend rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
