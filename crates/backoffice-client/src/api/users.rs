//! Users API.

use uuid::Uuid;

use crate::client::BackofficeClient;
use crate::error::Result;
use crate::types::{
    ListParams, Message, UserCreate, UserPublic, UserRegister, UserUpdate, UsersPublic,
};

/// Users API client.
pub struct UsersApi {
    client: BackofficeClient,
}

impl UsersApi {
    pub(crate) fn new(client: BackofficeClient) -> Self {
        Self { client }
    }

    /// Get the current authenticated user.
    pub async fn me(&self) -> Result<UserPublic> {
        self.client.get("users/me").await
    }

    /// Self-service registration.
    pub async fn signup(&self, request: &UserRegister) -> Result<UserPublic> {
        self.client.post("users/signup", request).await
    }

    /// List users (admin).
    pub async fn list(&self, params: ListParams) -> Result<UsersPublic> {
        self.client.get_with_query("users", &params).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: Uuid) -> Result<UserPublic> {
        self.client.get(&format!("users/{}", id)).await
    }

    /// Create a user (admin).
    pub async fn create(&self, request: &UserCreate) -> Result<UserPublic> {
        self.client.post("users", request).await
    }

    /// Update a user (admin).
    pub async fn update(&self, id: Uuid, request: &UserUpdate) -> Result<UserPublic> {
        self.client.patch(&format!("users/{}", id), request).await
    }

    /// Delete a user (admin).
    pub async fn delete(&self, id: Uuid) -> Result<Message> {
        self.client.delete(&format!("users/{}", id)).await
    }
}
