//! Canonical query-key builders.
//!
//! All call sites derive keys from here, so the same logical resource can
//! never fragment across differently-spelled keys.

use serde_json::json;

use backoffice_client::ListParams;
use backoffice_query::QueryKey;

/// Namespace covering every user-related read.
pub fn users_namespace() -> QueryKey {
    QueryKey::root("users")
}

/// The current authenticated user.
pub fn current_user() -> QueryKey {
    users_namespace().push("current")
}

/// One page of the users listing.
pub fn users_page(params: ListParams) -> QueryKey {
    users_namespace().push(json!({"limit": params.limit, "skip": params.skip}))
}

/// Namespace covering every item-related read.
pub fn items_namespace() -> QueryKey {
    QueryKey::root("items")
}

/// One page of the items listing.
pub fn items_page(params: ListParams) -> QueryKey {
    items_namespace().push(json!({"limit": params.limit, "skip": params.skip}))
}
