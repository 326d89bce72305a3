//! Authenticated query cache.
//!
//! Every cache-backed remote read that requires a session passes through
//! [`QueryCache::run`], so session-expiry policy is enforced in exactly one
//! place:
//!
//! - reads are gated on an active session and never run anonymously
//! - failures retry a bounded number of times, except HTTP 401 which is a
//!   definitive session-invalid signal and is never retried
//! - a 401 tears the session down at most once, drops the offending cache
//!   entry, and hands control to the embedder's logout sequence
//!
//! Concurrent reads for the same [`QueryKey`] share a single in-flight
//! request; removing a key while its fetch is in flight discards the
//! response on arrival instead of repopulating the cache.

mod cache;
mod config;
mod error;
mod key;

pub use cache::{FetchOutcome, QueryCache, QuerySnapshot, QueryStatus, UnauthorizedHook};
pub use config::QueryConfig;
pub use error::{QueryError, RemoteError, Result};
pub use key::QueryKey;
