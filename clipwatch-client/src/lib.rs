//! Clipwatch HTTP Client
//!
//! A small, type-safe HTTP client for the video processing service.
//!
//! The same client serves the upload and trigger flows and, through its
//! [`StatusFetcher`](clipwatch_core::StatusFetcher) implementation, the
//! status poll loop.
//!
//! # Example
//!
//! ```no_run
//! use clipwatch_client::ProcessingClient;
//! use clipwatch_core::JobId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ProcessingClient::new("http://localhost:5000")?;
//!     client.login("alice", "secret").await?;
//!
//!     let response = client.trigger_processing(&JobId::from("42")).await?;
//!     println!("{}", response.message);
//!     Ok(())
//! }
//! ```

mod auth;
pub mod error;
mod status;
mod videos;

pub use error::{ClientError, Result};

use clipwatch_core::dto::action::ActionResponse;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the processing service
///
/// Requests share one cookie store, so a successful [`login`](Self::login)
/// authenticates every later upload, trigger and status call.
#[derive(Debug, Clone)]
pub struct ProcessingClient {
    /// Base URL of the service (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ProcessingClient {
    /// Create a new client with its own cookie store
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:5000")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// The caller is responsible for enabling a cookie store on `client` if
    /// the service requires a login session.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx responses become errors. When the body is the service's JSON
    /// envelope its `message` is used as the error text.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(error_from_body(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Builds the error for a failed response from its raw body
fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ActionResponse>(body)
        .map(|envelope| envelope.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::api_error(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ProcessingClient::new("http://localhost:5000").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ProcessingClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = ProcessingClient::with_client("http://localhost:5000", Client::new());
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_error_from_envelope() {
        let err = error_from_body(
            StatusCode::UNAUTHORIZED,
            r#"{"success": false, "message": "Not authenticated"}"#,
        );
        assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Not authenticated"));

        let err = error_from_body(
            StatusCode::NOT_FOUND,
            r#"{"success": false, "message": "Video not found"}"#,
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_from_plain_body() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "upstream down\n");
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
