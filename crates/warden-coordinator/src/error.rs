use thiserror::Error;
use warden_storage::StorageError;

/// Result type for write-path operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// Write-path faults.
///
/// Ordinary outcomes (a duplicate add, an absent removal target, an
/// adapter that declines a mutation) are `Ok(false)` results, never
/// errors. Only an underlying storage fault surfaces here, unmodified.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("storage fault: {0}")]
    Storage(#[from] StorageError),
}
