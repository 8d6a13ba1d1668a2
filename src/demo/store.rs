//! Key-value store abstraction for demo session state.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use thiserror::Error;

/// Entries kept by [`MemoryStore::default`].
pub const DEFAULT_MAX_ENTRIES: usize = 1_000;
/// Idle lifetime used by [`MemoryStore::default`].
pub const DEFAULT_TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store is full ({capacity} entries)")]
    Full { capacity: usize },
}

/// Session storage injected into the app state.
///
/// Values are JSON so a networked store can be swapped in without touching
/// call sites.
pub trait SessionStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Returns whether a value was removed.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool, StoreError>>;
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local store. Lost on restart; last writer wins per key.
///
/// Every write refreshes the entry's TTL. New keys are refused once
/// `max_entries` live entries exist.
#[derive(Debug)]
pub struct MemoryStore {
    inner: DashMap<String, Entry>,
    max_entries: usize,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            max_entries,
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.inner.len())
    }

    fn get_live(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let value = self
            .inner
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone());
        if value.is_none() {
            self.inner.remove_if(key, |_, entry| !entry.is_live(now));
        }
        value
    }

    fn insert(&self, key: &str, value: Value) -> Result<(), StoreError> {
        if !self.inner.contains_key(key) && self.inner.len() >= self.max_entries {
            let purged = self.purge_expired();
            if self.inner.len() >= self.max_entries {
                tracing::warn!(capacity = self.max_entries, "Session store full");
                return Err(StoreError::Full {
                    capacity: self.max_entries,
                });
            }
            tracing::debug!(purged, "Expired sessions purged");
        }

        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.insert(key.to_string(), entry);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

impl SessionStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        future::ready(Ok(self.get_live(key))).boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
        future::ready(self.insert(key, value)).boxed()
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<bool, StoreError>> {
        let now = Instant::now();
        let removed = self
            .inner
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now));
        future::ready(Ok(removed)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_operations() {
        let store = MemoryStore::default();
        assert!(store.get("a").await.unwrap().is_none());

        store.set("a", json!({ "step": "profile" })).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!({ "step": "profile" })));
        assert_eq!(store.len(), 1);

        store.set("a", json!({ "step": "business" })).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!({ "step": "business" })));

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_refuses_new_keys() {
        let store = MemoryStore::new(2, DEFAULT_TTL);
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();

        assert_eq!(
            store.set("c", json!(3)).await,
            Err(StoreError::Full { capacity: 2 })
        );
        // Existing keys can still be updated.
        store.set("a", json!(10)).await.unwrap();

        assert!(store.delete("b").await.unwrap());
        store.set("c", json!(3)).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible_and_reclaimed() {
        let store = MemoryStore::new(1, Duration::ZERO);
        store.set("a", json!(1)).await.unwrap();

        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.is_empty());

        store.set("a", json!(1)).await.unwrap();
        // The expired entry makes room for a new key.
        store.set("b", json!(2)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.delete("b").await.unwrap());
    }
}
