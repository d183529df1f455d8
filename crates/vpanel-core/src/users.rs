//! User directory.
//!
//! One JSON record per user under `users/<id>`. The device ID is the
//! natural key — writing an existing ID overwrites the record, which is
//! how the console edits a user. Expiry is advisory metadata consumed by
//! the client app; nothing here enforces it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::UserError;
use vpanel_store::RecordStore;

/// Key prefix for user records.
pub const USER_PREFIX: &str = "users/";

fn user_key(id: &str) -> String {
    format!("{USER_PREFIX}{id}")
}

/// A managed user: device ID plus advisory expiry date.
///
/// Field names are capitalized on the wire because the export JSON and the
/// stored records share this exact shape with the client app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: String,
    /// Expiry date in `DD/MM/YYYY` form.
    #[serde(rename = "Expiry")]
    pub expiry: String,
}

/// Repository for user records.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn RecordStore>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All users in ascending ID order.
    ///
    /// A record that fails to decode is logged and skipped rather than
    /// failing the whole listing; one corrupt row should not take the
    /// dashboard down.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Store`] if the store itself fails.
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        let keys = self.store.list(USER_PREFIX).await?;
        let mut users = Vec::with_capacity(keys.len());
        for key in keys {
            // A record can vanish between list and get; that is not an error.
            let Some(bytes) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => users.push(user),
                Err(e) => warn!(key = %key, error = %e, "skipping undecodable user record"),
            }
        }
        Ok(users)
    }

    /// Look up one user by device ID.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Encoding`] if the stored record is not valid
    /// JSON, or [`UserError::Store`] if the read fails.
    pub async fn get(&self, id: &str) -> Result<Option<User>, UserError> {
        match self.store.get(&user_key(id)).await? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| UserError::Encoding {
                    id: id.to_owned(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Create or overwrite a user record (last write wins).
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Encoding`] if the record cannot be serialized,
    /// or [`UserError::Store`] if the write fails.
    pub async fn upsert(&self, user: &User) -> Result<(), UserError> {
        let bytes = serde_json::to_vec(user).map_err(|e| UserError::Encoding {
            id: user.id.clone(),
            reason: e.to_string(),
        })?;
        self.store.set(&user_key(&user.id), &bytes).await?;
        Ok(())
    }

    /// Remove a user record. Removing an unknown ID is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Store`] if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), UserError> {
        self.store.delete(&user_key(id)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpanel_store::MemoryStore;

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(MemoryStore::new()))
    }

    fn user(id: &str, expiry: &str) -> User {
        User {
            id: id.to_owned(),
            expiry: expiry.to_owned(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let dir = directory();
        dir.upsert(&user("dev1", "01/01/2025")).await.unwrap();
        assert_eq!(dir.get("dev1").await.unwrap(), Some(user("dev1", "01/01/2025")));
    }

    #[tokio::test]
    async fn upsert_same_id_overwrites() {
        let dir = directory();
        dir.upsert(&user("dev1", "01/01/2025")).await.unwrap();
        dir.upsert(&user("dev1", "31/12/2030")).await.unwrap();

        let users = dir.list().await.unwrap();
        assert_eq!(users, vec![user("dev1", "31/12/2030")]);
    }

    #[tokio::test]
    async fn list_is_sorted_by_id() {
        let dir = directory();
        dir.upsert(&user("zulu", "01/01/2025")).await.unwrap();
        dir.upsert(&user("alpha", "01/01/2025")).await.unwrap();

        let ids: Vec<_> = dir.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["alpha", "zulu"]);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let dir = directory();
        dir.upsert(&user("dev1", "01/01/2025")).await.unwrap();
        dir.upsert(&user("dev2", "01/01/2025")).await.unwrap();
        dir.delete("dev1").await.unwrap();

        assert_eq!(dir.get("dev1").await.unwrap(), None);
        assert!(dir.get("dev2").await.unwrap().is_some());
        // Deleting an unknown ID is fine.
        dir.delete("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn list_skips_undecodable_records() {
        let store = Arc::new(MemoryStore::new());
        let dir = UserDirectory::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        dir.upsert(&user("good", "01/01/2025")).await.unwrap();
        store.set("users/bad", b"not json").await.unwrap();

        let users = dir.list().await.unwrap();
        assert_eq!(users, vec![user("good", "01/01/2025")]);
    }
}
