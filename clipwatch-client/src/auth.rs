//! Session login

use clipwatch_core::dto::action::LoginForm;
use tracing::info;

use crate::ProcessingClient;
use crate::error::{ClientError, Result};

impl ProcessingClient {
    /// Log in and keep the session cookie for later requests
    ///
    /// The service answers a good login with a redirect to the dashboard and
    /// a bad one by re-rendering the login page, so success is judged by
    /// where the request ended up.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&LoginForm {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), "Login request failed"));
        }

        if !response.url().path().ends_with("/dashboard") {
            return Err(ClientError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        info!("Logged in as {}", username);
        Ok(())
    }
}
