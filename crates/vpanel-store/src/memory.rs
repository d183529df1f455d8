//! In-memory record store.
//!
//! Backed by a `BTreeMap` behind a `RwLock`, so keys stay sorted and prefix
//! scans are a simple range walk. Nothing is persisted — data lives exactly
//! as long as the process. The server offers this backend for throwaway
//! deployments and the test suites lean on it everywhere.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{RecordStore, StoreError};

/// An in-memory [`RecordStore`] backed by a sorted map.
///
/// Cloning is cheap and clones share the same underlying map.
///
/// # Examples
///
/// ```
/// # use vpanel_store::{MemoryStore, RecordStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.set("config/Marquee", b"welcome").await.unwrap();
/// assert_eq!(store.get("config/Marquee").await.unwrap(), Some(b"welcome".to_vec()));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.records.read().await.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("users/nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("config/AdminUrl", b"https://t.me/op").await.unwrap();
        assert_eq!(
            store.get("config/AdminUrl").await.unwrap(),
            Some(b"https://t.me/op".to_vec())
        );
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryStore::new();
        store.set("config/Marquee", b"old").await.unwrap();
        store.set("config/Marquee", b"new").await.unwrap();
        assert_eq!(store.get("config/Marquee").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn delete_removes_and_tolerates_absence() {
        let store = MemoryStore::new();
        store.set("users/dev1", b"{}").await.unwrap();
        store.delete("users/dev1").await.unwrap();
        assert_eq!(store.get("users/dev1").await.unwrap(), None);
        // Deleting again must not error.
        store.delete("users/dev1").await.unwrap();
    }

    #[tokio::test]
    async fn list_returns_only_prefixed_keys_sorted() {
        let store = MemoryStore::new();
        store.set("users/bob", b"1").await.unwrap();
        store.set("users/alice", b"2").await.unwrap();
        store.set("trial_history/bob", b"3").await.unwrap();
        store.set("config/Marquee", b"4").await.unwrap();

        let keys = store.list("users/").await.unwrap();
        assert_eq!(keys, vec!["users/alice", "users/bob"]);
    }

    #[tokio::test]
    async fn list_without_matches_is_empty() {
        let store = MemoryStore::new();
        store.set("config/Marquee", b"x").await.unwrap();
        assert!(store.list("users/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exists_probes_without_copying() {
        let store = MemoryStore::new();
        store.set("trial_history/dev1", b"1").await.unwrap();
        assert!(store.exists("trial_history/dev1").await.unwrap());
        assert!(!store.exists("trial_history/dev2").await.unwrap());
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("config/Marquee", b"shared").await.unwrap();
        assert_eq!(view.get("config/Marquee").await.unwrap(), Some(b"shared".to_vec()));
    }
}
