//! Error types for query cache operations.

/// A failed remote read, as observed by the cache.
///
/// Carries the HTTP status when a response was received; a transport-level
/// failure (no response) has no status.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,

    /// Human-readable message.
    pub message: String,
}

impl RemoteError {
    /// A failure with an HTTP status code.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A transport-level failure with no HTTP response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Whether this failure is the definitive session-invalid signal.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// Error type for query cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// No session token is present; the query did not run.
    #[error("Query disabled: no active session")]
    Disabled,

    /// The remote read failed after exhausting the retry policy.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The cached value could not be decoded into the requested type.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for query cache operations.
pub type Result<T> = std::result::Result<T, QueryError>;
