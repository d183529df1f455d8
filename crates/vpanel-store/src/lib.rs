//! Record store abstraction for vpanel.
//!
//! This crate defines the [`RecordStore`] trait — the key-value persistence
//! contract everything in `vpanel-core` is written against. Keys are flat
//! UTF-8 strings namespaced with `/` (e.g. `config/Marquee`, `users/dev1`);
//! values are opaque byte arrays. The store guarantees atomic single-key
//! reads and writes; it deliberately exposes no multi-key transactions, so
//! sequences spanning several keys are best-effort at the layers above.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] — in-memory, for tests and throwaway deployments
//! - [`RedbStore`] — persistent, backed by redb (feature `redb-backend`)

mod error;
mod memory;
#[cfg(feature = "redb-backend")]
mod redb_store;

pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "redb-backend")]
pub use redb_store::RedbStore;

/// A pluggable key-value record store.
///
/// Absent keys are an ordinary condition, not an error: [`get`] returns
/// `Ok(None)` and [`delete`] is idempotent. Implementations must be safe to
/// share across async tasks (`Send + Sync`).
///
/// [`get`]: RecordStore::get
/// [`delete`]: RecordStore::delete
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Retrieve the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the backend fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, overwriting any existing value.
    ///
    /// The write is atomic with respect to concurrent readers of the same
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the backend fails.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a key that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Delete`] if the backend fails.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Return all keys beginning with `prefix`, in ascending key order.
    ///
    /// Values are not returned; callers fetch them individually with
    /// [`get`](RecordStore::get).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::List`] if the backend fails.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Check whether `key` is present.
    ///
    /// The default implementation fetches the value and discards it;
    /// backends may override with a cheaper probe.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the backend fails.
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }
}
