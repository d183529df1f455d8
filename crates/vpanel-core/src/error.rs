//! Error types for `vpanel-core`.
//!
//! Subsystems that can only fail through the store propagate
//! [`StoreError`] directly; the enums here exist where a subsystem has
//! failure modes of its own.
//!
//! [`StoreError`]: vpanel_store::StoreError

use vpanel_store::StoreError;

/// Errors from the user directory.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// A stored user record could not be encoded or decoded.
    #[error("user record '{id}' is not valid JSON: {reason}")]
    Encoding { id: String, reason: String },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the trial issuance gate.
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    /// A trial was already granted for this device ID.
    #[error("trial already used for device '{id}'")]
    AlreadyUsed { id: String },

    /// Writing the granted user record failed.
    #[error(transparent)]
    User(#[from] UserError),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
