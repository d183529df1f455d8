//! Shared application state.
//!
//! One [`AppState`] is built at startup from the configuration and the
//! chosen record store, then shared across all handlers via `Arc`. All of
//! it is immutable for the process lifetime — mutation happens only inside
//! the store.

use std::sync::Arc;

use vpanel_core::{BlobStore, Settings, TrialGate, UserDirectory};
use vpanel_store::RecordStore;

use crate::config::ServerConfig;
use crate::session::SessionGate;

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub users: UserDirectory,
    pub blob: BlobStore,
    pub trial: TrialGate,
    pub session: SessionGate,
    /// Reject unauthenticated browser requests to the raw JSON export.
    pub gate_browser_raw: bool,
}

impl AppState {
    /// Assemble the repositories over `store` per `config`.
    #[must_use]
    pub fn new(config: &ServerConfig, store: Arc<dyn RecordStore>) -> Self {
        let users = UserDirectory::new(Arc::clone(&store));
        let trial = TrialGate::new(Arc::clone(&store), users.clone())
            .with_trial_days(config.trial_days);

        Self {
            settings: Settings::new(Arc::clone(&store)),
            blob: BlobStore::new(store),
            users,
            trial,
            session: SessionGate::new(config.admin_password.clone(), config.cookie_name.clone()),
            gate_browser_raw: config.gate_browser_raw,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
