use compliance_types::ComplianceError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ComplianceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => ComplianceError::StoreUnavailable(reason),
            other => ComplianceError::StoreUnavailable(other.to_string()),
        }
    }
}
