//! Structural query keys.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// Identity of a cached remote read.
///
/// A key is an ordered sequence of JSON-serializable segments, e.g.
/// `["users","current"]` or `["items",{"limit":5,"skip":0}]`. Two keys
/// compare equal when their segments are structurally equal; equal keys
/// share one cached value and one in-flight request.
///
/// Equality and hashing go through a canonical JSON rendering of the
/// segments, so object segments compare by content regardless of how they
/// were built.
#[derive(Debug, Clone)]
pub struct QueryKey {
    segments: Vec<Value>,
    canonical: String,
}

impl QueryKey {
    /// Build a key from raw segments.
    pub fn new(segments: Vec<Value>) -> Self {
        let canonical = Value::Array(segments.clone()).to_string();
        Self {
            segments,
            canonical,
        }
    }

    /// A single-segment key naming a resource namespace.
    pub fn root(namespace: &str) -> Self {
        Self::new(vec![Value::String(namespace.to_string())])
    }

    /// Append a segment, returning the extended key.
    pub fn push(mut self, segment: impl Into<Value>) -> Self {
        self.segments.push(segment.into());
        self.canonical = Value::Array(self.segments.clone()).to_string();
        self
    }

    /// The key's segments in order.
    pub fn segments(&self) -> &[Value] {
        &self.segments
    }

    /// Canonical rendering used for equality and hashing.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether this key falls under the given prefix.
    ///
    /// `["users",{"limit":5,"skip":0}]` starts with `["users"]`, so a
    /// namespace-wide invalidation reaches every listing page.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_equality() {
        let a = QueryKey::root("items").push(json!({"limit": 5, "skip": 0}));
        let b = QueryKey::root("items").push(json!({"skip": 0, "limit": 5}));
        // serde_json sorts object keys, so field order does not matter.
        assert_eq!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_distinct_pages_are_distinct_keys() {
        let a = QueryKey::root("items").push(json!({"limit": 5, "skip": 0}));
        let b = QueryKey::root("items").push(json!({"limit": 5, "skip": 5}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_starts_with() {
        let namespace = QueryKey::root("users");
        let current = QueryKey::root("users").push("current");
        let page = QueryKey::root("users").push(json!({"limit": 10, "skip": 0}));
        let other = QueryKey::root("items").push("current");

        assert!(current.starts_with(&namespace));
        assert!(page.starts_with(&namespace));
        assert!(namespace.starts_with(&namespace));
        assert!(!other.starts_with(&namespace));
        assert!(!namespace.starts_with(&current));
    }

    #[test]
    fn test_display_is_canonical_json() {
        let key = QueryKey::root("users").push("current");
        assert_eq!(key.to_string(), r#"["users","current"]"#);
    }
}
