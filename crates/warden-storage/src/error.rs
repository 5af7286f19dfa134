use thiserror::Error;

/// Result type for adapter operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer faults.
///
/// These are genuine faults, not ordinary outcomes: an adapter that
/// merely declines a mutation returns `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("operation not supported by this adapter: {0}")]
    Unsupported(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}
