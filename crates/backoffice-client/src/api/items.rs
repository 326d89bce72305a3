//! Items API.

use uuid::Uuid;

use crate::client::BackofficeClient;
use crate::error::Result;
use crate::types::{ItemCreate, ItemPublic, ItemUpdate, ItemsPublic, ListParams, Message};

/// Items API client.
pub struct ItemsApi {
    client: BackofficeClient,
}

impl ItemsApi {
    pub(crate) fn new(client: BackofficeClient) -> Self {
        Self { client }
    }

    /// List items visible to the current user.
    pub async fn list(&self, params: ListParams) -> Result<ItemsPublic> {
        self.client.get_with_query("items", &params).await
    }

    /// Get an item by ID.
    pub async fn get(&self, id: Uuid) -> Result<ItemPublic> {
        self.client.get(&format!("items/{}", id)).await
    }

    /// Create an item.
    pub async fn create(&self, request: &ItemCreate) -> Result<ItemPublic> {
        self.client.post("items", request).await
    }

    /// Replace an item.
    pub async fn update(&self, id: Uuid, request: &ItemUpdate) -> Result<ItemPublic> {
        self.client.put(&format!("items/{}", id), request).await
    }

    /// Delete an item.
    pub async fn delete(&self, id: Uuid) -> Result<Message> {
        self.client.delete(&format!("items/{}", id)).await
    }
}
