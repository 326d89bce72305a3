//! Typed HTTP client for the backoffice items/users API.
//!
//! The remote backend is a conventional JSON API with bearer auth and an
//! error envelope of `{"detail": string | array}`. This crate provides a
//! typed client over it; the bearer token comes from a shared
//! [`backoffice_session::TokenStore`] so login and logout take effect on
//! every request immediately.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use backoffice_client::{BackofficeClient, LoginCredentials};
//! use backoffice_session::MemoryTokenStore;
//!
//! # async fn example() -> backoffice_client::Result<()> {
//! let tokens = Arc::new(MemoryTokenStore::new());
//! let client = BackofficeClient::builder()
//!     .base_url("http://localhost:8000")
//!     .token_store(tokens.clone())
//!     .build()?;
//!
//! let token = client.auth().login(&LoginCredentials {
//!     username: "admin@example.com".to_string(),
//!     password: "secret".to_string(),
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{BackofficeClient, ClientBuilder};
pub use error::{Error, ErrorDetail, FieldError, Result, GENERIC_ERROR_MESSAGE};
pub use types::*;
