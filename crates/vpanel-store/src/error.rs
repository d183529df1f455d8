//! Store error types.
//!
//! Each variant names the key or prefix involved so a failure can be traced
//! from the log line alone.

/// Errors returned by [`RecordStore`](crate::RecordStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to open the backing database file.
    #[error("failed to open store at '{path}': {reason}")]
    Open { path: String, reason: String },

    /// Failed to read a value.
    #[error("failed to read key '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Failed to write a value.
    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Failed to delete a key.
    #[error("failed to delete key '{key}': {reason}")]
    Delete { key: String, reason: String },

    /// Failed to enumerate keys under a prefix.
    #[error("failed to list keys under '{prefix}': {reason}")]
    List { prefix: String, reason: String },

    /// Failed to begin or commit a backend transaction.
    #[error("store transaction failed: {reason}")]
    Transaction { reason: String },
}
