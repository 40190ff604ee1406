use thiserror::Error;

/// Failure talking to the REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {code}: {message}")]
    Status { code: u16, message: String },

    /// The backend answered but refused the operation (`success: false`).
    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Transient failures that a retry policy may repeat.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::Status { code, .. } => *code >= 500,
            ApiError::Rejected(_) | ApiError::Decode(_) => false,
        }
    }
}
