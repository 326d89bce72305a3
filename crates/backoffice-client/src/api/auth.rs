//! Auth API.

use crate::client::BackofficeClient;
use crate::error::Result;
use crate::types::{LoginCredentials, Message, NewPassword, Token, UserPublic};

/// Auth API client.
pub struct AuthApi {
    client: BackofficeClient,
}

impl AuthApi {
    pub(crate) fn new(client: BackofficeClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access token. Form-encoded, per the
    /// OAuth2 password flow the server speaks.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Token> {
        self.client
            .post_form("login/access-token", credentials)
            .await
    }

    /// Verify the stored token by fetching the user it belongs to.
    pub async fn test_token(&self) -> Result<UserPublic> {
        self.client.post_empty("login/test-token").await
    }

    /// Request a password recovery email.
    pub async fn recover_password(&self, email: &str) -> Result<Message> {
        let url = self.client.url_with_segment("password-recovery", email)?;
        self.client.post_empty_url(url).await
    }

    /// Reset a password using a recovery token.
    pub async fn reset_password(&self, body: &NewPassword) -> Result<Message> {
        self.client.post("reset-password", body).await
    }
}
