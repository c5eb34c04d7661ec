use thiserror::Error;

use crate::cache::KeyError;
use crate::storage::RepositoryError;

/// Errors returned by cache policy operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A required argument was missing or unusable. Raised before any cache
    /// or persistence effect.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The repository call failed. Carries the original error untouched.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<KeyError> for PolicyError {
    fn from(err: KeyError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<PolicyError> for RepositoryError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Repository(err) => err,
            PolicyError::InvalidArgument(msg) => RepositoryError::InvalidData(msg),
        }
    }
}

/// Result type for cache policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
