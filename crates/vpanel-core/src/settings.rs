//! Named configuration strings.
//!
//! A small fixed set of operator-editable settings, one record each under
//! `config/<Name>`. An absent record reads as the empty string, so a fresh
//! store needs no seeding step. Settings are only ever overwritten, never
//! deleted.

use std::sync::Arc;

use vpanel_store::{RecordStore, StoreError};

/// Contact link shown in the client app.
pub const ADMIN_URL: &str = "AdminUrl";
/// Scrolling announcement text shown in the client app.
pub const MARQUEE: &str = "Marquee";

fn setting_key(name: &str) -> String {
    format!("config/{name}")
}

/// Repository for the named settings.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn RecordStore>,
}

/// The full set of settings, fetched together for rendering and export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub admin_url: String,
    pub marquee: String,
}

impl Settings {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Read one setting, defaulting to `""` when it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn get(&self, name: &str) -> Result<String, StoreError> {
        let value = self.store.get(&setting_key(name)).await?;
        Ok(value
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default())
    }

    /// Overwrite one setting.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store write fails.
    pub async fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(&setting_key(name), value.as_bytes()).await
    }

    /// Fetch every known setting in one call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any store read fails.
    pub async fn snapshot(&self) -> Result<SettingsSnapshot, StoreError> {
        Ok(SettingsSnapshot {
            admin_url: self.get(ADMIN_URL).await?,
            marquee: self.get(MARQUEE).await?,
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpanel_store::MemoryStore;

    fn settings() -> Settings {
        Settings::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn unwritten_setting_is_empty_string() {
        let settings = settings();
        assert_eq!(settings.get(ADMIN_URL).await.unwrap(), "");
    }

    #[tokio::test]
    async fn set_then_get() {
        let settings = settings();
        settings.set(MARQUEE, "Contact admin for VIP").await.unwrap();
        assert_eq!(settings.get(MARQUEE).await.unwrap(), "Contact admin for VIP");
    }

    #[tokio::test]
    async fn snapshot_bundles_both_settings() {
        let settings = settings();
        settings.set(ADMIN_URL, "https://t.me/op").await.unwrap();
        let snap = settings.snapshot().await.unwrap();
        assert_eq!(snap.admin_url, "https://t.me/op");
        assert_eq!(snap.marquee, "");
    }
}
