//! Trial issuance gate.
//!
//! Each device ID gets at most one self-service trial. The gate is a
//! marker record under `trial_history/<id>` whose presence alone is the
//! signal — deliberately disjoint from the user record, so deleting a
//! user does not re-open eligibility and resetting eligibility does not
//! revoke an already-granted user.

use std::sync::Arc;

use tracing::info;

use crate::error::TrialError;
use crate::expiry;
use crate::users::{User, UserDirectory};
use vpanel_store::RecordStore;

/// Key prefix for trial markers.
pub const MARKER_PREFIX: &str = "trial_history/";

/// Trial length granted on issuance, in days.
pub const DEFAULT_TRIAL_DAYS: u64 = 3;

fn marker_key(id: &str) -> String {
    format!("{MARKER_PREFIX}{id}")
}

/// Grants time-limited user records, once per device ID.
#[derive(Clone)]
pub struct TrialGate {
    store: Arc<dyn RecordStore>,
    users: UserDirectory,
    trial_days: u64,
}

impl TrialGate {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, users: UserDirectory) -> Self {
        Self {
            store,
            users,
            trial_days: DEFAULT_TRIAL_DAYS,
        }
    }

    /// Override the trial length.
    #[must_use]
    pub fn with_trial_days(mut self, days: u64) -> Self {
        self.trial_days = days;
        self
    }

    /// Grant a trial to `id`, returning the created user record.
    ///
    /// Upserts a user expiring `trial_days` from today, then writes the
    /// marker that blocks the next claim. The two writes are not wrapped
    /// in a transaction: if the marker write is lost the ID becomes
    /// claimable again, which this console accepts as best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`TrialError::AlreadyUsed`] when a marker for `id` exists
    /// (no state is changed), or the underlying store/user error.
    pub async fn issue(&self, id: &str) -> Result<User, TrialError> {
        if self.store.exists(&marker_key(id)).await? {
            return Err(TrialError::AlreadyUsed { id: id.to_owned() });
        }

        let user = User {
            id: id.to_owned(),
            expiry: expiry::days_from_today(self.trial_days),
        };
        self.users.upsert(&user).await?;
        self.store.set(&marker_key(id), b"1").await?;

        info!(id, expiry = %user.expiry, "trial granted");
        Ok(user)
    }

    /// Re-open trial eligibility for `id`.
    ///
    /// Deletes the marker unconditionally; absent markers are fine. The
    /// user record granted by a previous trial is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TrialError::Store`] if the delete fails.
    pub async fn reset(&self, id: &str) -> Result<(), TrialError> {
        self.store.delete(&marker_key(id)).await?;
        info!(id, "trial eligibility reset");
        Ok(())
    }
}

impl std::fmt::Debug for TrialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialGate")
            .field("trial_days", &self.trial_days)
            .finish_non_exhaustive()
    }
}
