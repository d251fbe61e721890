// ABOUTME: Domain error taxonomy for product-scoped operations
// ABOUTME: Each variant maps deterministically to one HTTP status at the boundary

use canopy_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProductError {
    /// Referenced product/task/interview/grant/user does not exist.
    #[error("Resource not found")]
    NotFound,

    /// Caller resolved to a real identity but lacks the required role.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Malformed payload: bad role literal, unparsable field, missing value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Structurally valid request violating a core invariant.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Duplicate grant or other uniqueness clash.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence or AI collaborator failure; any partial writes were rolled back.
    #[error("Dependency failure: {0}")]
    Dependency(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for ProductError {
    fn from(err: sqlx::Error) -> Self {
        ProductError::Storage(StorageError::Sqlx(err))
    }
}

pub type ProductResult<T> = Result<T, ProductError>;
