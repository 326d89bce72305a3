//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bearer token issued on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Opaque access token.
    pub access_token: String,

    /// Token scheme, `bearer` unless the server says otherwise.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Login form credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    /// Account email.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// A user as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

/// Page of users with the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: u64,
}

/// Self-service registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Admin user-creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Partial user update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// An item as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPublic {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

/// Page of items with the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsPublic {
    pub data: Vec<ItemPublic>,
    pub count: u64,
}

/// Item creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Full item replacement payload.
#[derive(Debug, Clone, Serialize)]
pub struct ItemUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Password reset payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewPassword {
    pub token: String,
    pub new_password: String,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Caller-facing pagination input: a 1-based page or an explicit offset.
///
/// Callers normally supply exactly one of `page`/`skip`; when both are
/// present the explicit `skip` wins.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Explicit record offset.
    pub skip: Option<u64>,
    /// Page size. Must be greater than zero.
    pub limit: u64,
}

impl PageParams {
    /// Parameters for the given 1-based page.
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            skip: None,
            limit,
        }
    }

    /// Parameters for an explicit record offset.
    pub fn skip(skip: u64, limit: u64) -> Self {
        Self {
            page: None,
            skip: Some(skip),
            limit,
        }
    }

    /// Resolve to the wire parameters: `skip = (page - 1) * limit` unless an
    /// explicit `skip` was given.
    ///
    /// # Panics
    ///
    /// Debug builds panic when `limit` is zero; a zero page size would make
    /// every page identical and the offset arithmetic meaningless.
    pub fn resolve(&self) -> ListParams {
        debug_assert!(self.limit > 0, "limit must be greater than zero");
        let skip = match (self.skip, self.page) {
            (Some(skip), _) => skip,
            (None, Some(page)) => (page.max(1) - 1) * self.limit,
            (None, None) => 0,
        };
        ListParams {
            skip,
            limit: self.limit,
        }
    }
}

/// Resolved pagination parameters as sent on the wire.
///
/// Also forms part of the query key, so distinct pages and limits cache
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListParams {
    pub skip: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_resolves_to_zero_offset() {
        let params = PageParams::page(1, 5).resolve();
        assert_eq!(params, ListParams { skip: 0, limit: 5 });
    }

    #[test]
    fn test_later_page_resolves_offset() {
        let params = PageParams::page(3, 5).resolve();
        assert_eq!(params, ListParams { skip: 10, limit: 5 });
    }

    #[test]
    fn test_explicit_skip_wins_over_page() {
        let params = PageParams {
            page: Some(99),
            skip: Some(7),
            limit: 5,
        }
        .resolve();
        assert_eq!(params, ListParams { skip: 7, limit: 5 });
    }

    #[test]
    #[should_panic(expected = "limit must be greater than zero")]
    fn test_zero_limit_is_rejected() {
        let _ = PageParams::page(1, 0).resolve();
    }

    #[test]
    fn test_list_params_serialize_as_query() {
        let params = ListParams { skip: 10, limit: 5 };
        let query = serde_json::to_value(params).unwrap();
        assert_eq!(query, serde_json::json!({"skip": 10, "limit": 5}));
    }
}
