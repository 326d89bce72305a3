//! Configuration for the query cache.

use std::time::Duration;

/// Default maximum number of cached queries before LRU eviction.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Default number of additional attempts after a failed fetch.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Configuration for the query cache.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Maximum number of queries to cache before LRU eviction.
    pub max_entries: usize,

    /// Additional fetch attempts after the first failure.
    /// Never applies to HTTP 401.
    pub retries: u32,

    /// Base delay between retries (scaled linearly by attempt number).
    pub retry_delay: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl QueryConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached queries.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the number of additional attempts after a failed fetch.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the base delay between retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
