//! Token stores backing the session state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default token file name within the backoffice data directory.
pub const TOKEN_FILE: &str = "session-token.json";

/// Store for the single opaque session token.
///
/// The token is a bearer credential whose meaning is defined by the remote
/// API; no validation of its structure happens here. At most one token
/// exists at a time.
pub trait TokenStore: Send + Sync {
    /// Read the current token, if any. No side effects.
    fn get(&self) -> Option<String>;

    /// Persist a new token, replacing any previous one.
    fn set(&self, token: &str) -> Result<()>;

    /// Delete the stored token entirely. Idempotent; distinct from setting
    /// an empty string.
    fn clear(&self) -> Result<()>;

    /// Whether a token is currently present.
    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// Persisted token record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed token store for production use.
///
/// The token lives in a single JSON file under a fixed path and is mirrored
/// into an in-process cache so `get` never touches the filesystem.
#[derive(Debug)]
pub struct FileTokenStore {
    token_path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Create a store using [`TOKEN_FILE`] within the given directory.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(TOKEN_FILE))
    }

    /// Create a store with an explicit token file path.
    ///
    /// The file is read once here; a missing or malformed file means no
    /// session.
    pub fn with_path(token_path: PathBuf) -> Self {
        let cached = RwLock::new(read_token_file(&token_path));
        Self { token_path, cached }
    }

    /// Default token file path under the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("backoffice").join(TOKEN_FILE))
            .ok_or(Error::NoDataDir)
    }

    /// Get the token file path.
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }
}

fn read_token_file(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<StoredToken>(&raw) {
        Ok(stored) => Some(stored.token),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Malformed token file, treating as absent");
            None
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.cached.read().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create token directory: {}", e)))?;
        }

        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| Error::Serialization(format!("Failed to serialize token: {}", e)))?;

        std::fs::write(&self.token_path, json)
            .map_err(|e| Error::Storage(format!("Failed to write token file: {}", e)))?;

        *self.cached.write() = Some(token.to_string());
        debug!(path = %self.token_path.display(), "Session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.token_path.exists() {
            std::fs::remove_file(&self.token_path)
                .map_err(|e| Error::Storage(format!("Failed to delete token file: {}", e)))?;
        }

        *self.cached.write() = None;
        debug!("Session token cleared");
        Ok(())
    }
}

/// In-memory token store for tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a token.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_and_get() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);
        assert!(!store.is_authenticated());

        store.set("tok-1").unwrap();
        assert_eq!(store.get(), Some("tok-1".to_string()));
        assert!(store.is_authenticated());

        store.set("tok-2").unwrap();
        assert_eq!(store.get(), Some("tok-2".to_string()));
    }

    #[test]
    fn test_memory_clear_is_idempotent() {
        let store = MemoryTokenStore::with_token("tok");
        store.clear().unwrap();
        assert_eq!(store.get(), None);
        assert!(!store.is_authenticated());

        // Clearing twice is safe.
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.get(), None);
        store.set("secret").unwrap();
        assert_eq!(store.get(), Some("secret".to_string()));

        // A fresh store reads the same file back.
        let reloaded = FileTokenStore::new(dir.path());
        assert_eq!(reloaded.get(), Some("secret".to_string()));
        assert!(reloaded.is_authenticated());
    }

    #[test]
    fn test_file_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.set("secret").unwrap();
        assert!(store.token_path().exists());

        store.clear().unwrap();
        assert_eq!(store.get(), None);
        assert!(!store.token_path().exists());

        // Idempotent with the file already gone.
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_malformed_file_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE);
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::with_path(path);
        assert_eq!(store.get(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(TOKEN_FILE);
        let store = FileTokenStore::with_path(path);

        store.set("secret").unwrap();
        assert_eq!(store.get(), Some("secret".to_string()));
    }
}
