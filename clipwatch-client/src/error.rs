//! Error types for the clipwatch client

use clipwatch_core::domain::media::MediaRejection;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the clipwatch client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The session is missing or expired
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// File refused before any request was made
    #[error("{0}")]
    Rejected(#[from] MediaRejection),

    /// Local file could not be read
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Message the server attached to a refused request, if any
    ///
    /// Transport and parse failures have no server message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } | Self::Unauthorized(message) | Self::NotFound(message) => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ClientError::api_error(500, "Database error");
        assert_eq!(err.server_message(), Some("Database error"));
        assert!(!err.is_not_found());

        let err = ClientError::ParseError("bad json".to_string());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_rejection_message_passes_through() {
        let err = ClientError::from(MediaRejection::NoFileSelected);
        assert_eq!(err.to_string(), "Please select a video file!");
    }
}
