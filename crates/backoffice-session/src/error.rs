//! Error types for token store operations.

/// Error type for token store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the backing storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The token record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No platform data directory is available for the default store path.
    #[error("No platform data directory available")]
    NoDataDir,
}

/// Result type for token store operations.
pub type Result<T> = std::result::Result<T, Error>;
