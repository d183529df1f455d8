//! Persistent record store backed by redb.
//!
//! Pure-Rust, single-file, transactional. Each trait call runs one redb
//! transaction on the blocking thread pool so the async executor is never
//! stalled by file I/O. Feature-gated behind `redb-backend`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::{RecordStore, StoreError};

/// All records live in one table; namespacing happens in the key itself
/// (`config/...`, `users/...`, `trial_history/...`).
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// A [`RecordStore`] persisted in a redb database file.
///
/// # Examples
///
/// ```no_run
/// # use vpanel_store::RedbStore;
/// let store = RedbStore::open("/var/lib/vpanel/vpanel.redb").unwrap();
/// ```
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open the database at `path`, creating file and table on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be created or opened,
    /// and [`StoreError::Transaction`] if the initial table-creating
    /// transaction fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // A write transaction creates the table if this is a fresh file.
        let txn = db.begin_write().map_err(|e| StoreError::Transaction {
            reason: e.to_string(),
        })?;
        {
            txn.open_table(RECORDS).map_err(|e| StoreError::Open {
                path: path.display().to_string(),
                reason: format!("records table: {e}"),
            })?;
        }
        txn.commit().map_err(|e| StoreError::Transaction {
            reason: e.to_string(),
        })?;

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Filesystem path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl RecordStore for RedbStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_read().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })?;
            let table = txn.open_table(RECORDS).map_err(|e| StoreError::Read {
                key: key.clone(),
                reason: e.to_string(),
            })?;
            let value = table
                .get(key.as_str())
                .map_err(|e| StoreError::Read {
                    key: key.clone(),
                    reason: e.to_string(),
                })?
                .map(|guard| guard.value().to_vec());
            Ok(value)
        })
        .await
        .map_err(|e| StoreError::Read {
            key: String::new(),
            reason: format!("blocking task failed: {e}"),
        })?
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_write().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })?;
            {
                let mut table = txn.open_table(RECORDS).map_err(|e| StoreError::Write {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(|e| StoreError::Write {
                        key: key.clone(),
                        reason: e.to_string(),
                    })?;
            }
            txn.commit().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StoreError::Write {
            key: String::new(),
            reason: format!("blocking task failed: {e}"),
        })?
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let db = Arc::clone(&self.db);
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_write().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })?;
            {
                let mut table = txn.open_table(RECORDS).map_err(|e| StoreError::Delete {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                // remove() returns Ok(None) for an absent key, which is
                // exactly the idempotence the trait promises.
                table.remove(key.as_str()).map_err(|e| StoreError::Delete {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            }
            txn.commit().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StoreError::Delete {
            key: String::new(),
            reason: format!("blocking task failed: {e}"),
        })?
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let db = Arc::clone(&self.db);
        let prefix = prefix.to_owned();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_read().map_err(|e| StoreError::Transaction {
                reason: e.to_string(),
            })?;
            let table = txn.open_table(RECORDS).map_err(|e| StoreError::List {
                prefix: prefix.clone(),
                reason: e.to_string(),
            })?;

            let mut keys = Vec::new();
            let range = table
                .range(prefix.as_str()..)
                .map_err(|e| StoreError::List {
                    prefix: prefix.clone(),
                    reason: e.to_string(),
                })?;
            for entry in range {
                let (k, _) = entry.map_err(|e| StoreError::List {
                    prefix: prefix.clone(),
                    reason: e.to_string(),
                })?;
                let k = k.value();
                if !k.starts_with(&prefix) {
                    break;
                }
                keys.push(k.to_owned());
            }
            Ok(keys)
        })
        .await
        .map_err(|e| StoreError::List {
            prefix: String::new(),
            reason: format!("blocking task failed: {e}"),
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("config/Marquee", b"persisted").await.unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("config/Marquee").await.unwrap(),
            Some(b"persisted".to_vec())
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = temp_store();
        store.set("users/dev1", b"{}").await.unwrap();
        store.delete("users/dev1").await.unwrap();
        store.delete("users/dev1").await.unwrap();
        assert_eq!(store.get("users/dev1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_stops_at_prefix_boundary() {
        let (_dir, store) = temp_store();
        store.set("users/a", b"1").await.unwrap();
        store.set("users/b", b"2").await.unwrap();
        store.set("usersx", b"3").await.unwrap();
        let keys = store.list("users/").await.unwrap();
        assert_eq!(keys, vec!["users/a", "users/b"]);
    }
}
