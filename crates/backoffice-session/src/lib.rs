//! Persisted session token store.
//!
//! Holds the single opaque bearer token that proves authentication against
//! the backoffice API. The token is process-wide state with a documented
//! lifecycle: read from storage at startup, overwritten on login, deleted on
//! logout or when an authenticated read is rejected.
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice_session::{FileTokenStore, TokenStore};
//!
//! let store = FileTokenStore::with_path(FileTokenStore::default_path()?);
//! store.set("secret")?;
//! assert!(store.is_authenticated());
//! store.clear()?;
//! ```

mod error;
mod store;

pub use error::{Error, Result};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_FILE};
