//! Cache-backed domain reads.
//!
//! Thin functions wiring the typed client into the query cache through the
//! canonical key builders. Every read here is gated on the session and
//! inherits the cache's retry and 401 policy.

use futures::future::BoxFuture;
use serde::Serialize;

use backoffice_client::{BackofficeClient, ItemsPublic, PageParams, UserPublic, UsersPublic};
use backoffice_query::{FetchOutcome, QueryCache, RemoteError, Result};

use crate::keys;

/// Convert a client failure into the cache's remote-error shape.
pub(crate) fn remote_error(err: backoffice_client::Error) -> RemoteError {
    match err.status() {
        Some(status) => RemoteError::with_status(status, err.user_message()),
        None => RemoteError::transport(err.user_message()),
    }
}

fn to_outcome<T: Serialize>(result: backoffice_client::Result<T>) -> FetchOutcome {
    match result {
        Ok(value) => {
            serde_json::to_value(value).map_err(|e| RemoteError::transport(e.to_string()))
        }
        Err(err) => Err(remote_error(err)),
    }
}

/// The current authenticated user.
pub async fn current_user(cache: &QueryCache, client: &BackofficeClient) -> Result<UserPublic> {
    let client = client.clone();
    cache
        .run(
            &keys::current_user(),
            move || -> BoxFuture<'static, FetchOutcome> {
                let client = client.clone();
                Box::pin(async move { to_outcome(client.users().me().await) })
            },
        )
        .await
}

/// One page of items.
pub async fn fetch_items(
    cache: &QueryCache,
    client: &BackofficeClient,
    params: PageParams,
) -> Result<ItemsPublic> {
    let list = params.resolve();
    let client = client.clone();
    cache
        .run(
            &keys::items_page(list),
            move || -> BoxFuture<'static, FetchOutcome> {
                let client = client.clone();
                Box::pin(async move { to_outcome(client.items().list(list).await) })
            },
        )
        .await
}

/// Warm the cache for a page of items ahead of navigation.
pub async fn prefetch_items(cache: &QueryCache, client: &BackofficeClient, params: PageParams) {
    let list = params.resolve();
    let client = client.clone();
    cache
        .prefetch(
            &keys::items_page(list),
            move || -> BoxFuture<'static, FetchOutcome> {
                let client = client.clone();
                Box::pin(async move { to_outcome(client.items().list(list).await) })
            },
        )
        .await;
}

/// One page of users (admin).
pub async fn fetch_users(
    cache: &QueryCache,
    client: &BackofficeClient,
    params: PageParams,
) -> Result<UsersPublic> {
    let list = params.resolve();
    let client = client.clone();
    cache
        .run(
            &keys::users_page(list),
            move || -> BoxFuture<'static, FetchOutcome> {
                let client = client.clone();
                Box::pin(async move { to_outcome(client.users().list(list).await) })
            },
        )
        .await
}

/// Warm the cache for a page of users ahead of navigation.
pub async fn prefetch_users(cache: &QueryCache, client: &BackofficeClient, params: PageParams) {
    let list = params.resolve();
    let client = client.clone();
    cache
        .prefetch(
            &keys::users_page(list),
            move || -> BoxFuture<'static, FetchOutcome> {
                let client = client.clone();
                Box::pin(async move { to_outcome(client.users().list(list).await) })
            },
        )
        .await;
}
