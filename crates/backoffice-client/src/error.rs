//! Client error types.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Message shown when a structured validation error cannot be rendered as a
/// single string.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response existed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Parsed error envelope.
        detail: ErrorDetail,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status code of the failure, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Human-readable message for display.
    ///
    /// A string-shaped `detail` passes through unchanged; an array-shaped
    /// `detail` collapses to [`GENERIC_ERROR_MESSAGE`] since no call site
    /// renders field-level validation errors; transport failures use the
    /// transport error's own message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api {
                detail: ErrorDetail::Message(msg),
                ..
            } => msg.clone(),
            Error::Api {
                detail: ErrorDetail::Fields(_),
                ..
            } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The `detail` payload of the API error envelope: either a plain message
/// or a list of field-level validation errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain message.
    Message(String),
    /// Structured validation errors.
    Fields(Vec<FieldError>),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::Message(msg) => f.write_str(msg),
            ErrorDetail::Fields(_) => f.write_str(GENERIC_ERROR_MESSAGE),
        }
    }
}

/// One entry of an array-shaped `detail`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    /// Validation message.
    pub msg: String,

    /// Location of the offending field.
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,

    /// Error kind identifier.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Error response body from the server.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub detail: ErrorDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_passes_through() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"detail": "Incorrect email or password"}"#).unwrap();
        let err = Error::Api {
            status: 400,
            detail: envelope.detail,
        };
        assert_eq!(err.user_message(), "Incorrect email or password");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_array_detail_collapses_to_generic_message() {
        let body = r#"{"detail": [{"msg": "field required", "loc": ["body", "email"], "type": "missing"}]}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        let err = Error::Api {
            status: 422,
            detail: envelope.detail,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_is_auth_error() {
        let err = Error::Api {
            status: 401,
            detail: ErrorDetail::Message("Could not validate credentials".to_string()),
        };
        assert!(err.is_auth_error());
        assert!(!err.is_not_found());
    }
}
