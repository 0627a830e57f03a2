//! Replication errors

use outpost_ai::SnapshotError;
use thiserror::Error;

/// Reasons a sync message is rejected. Every variant rejects the whole
/// message; nothing is partially applied.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Bytes do not decode to a known message (missing fields, unknown tags)
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Sender speaks another protocol version
    #[error("Protocol version mismatch: message version {found}, expected {expected}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Message is not newer than the last one applied
    #[error("Stale message: sequence {sequence}, last applied {last}")]
    StaleSequence { sequence: u64, last: u64 },

    /// Enemy snapshot failed validation
    #[error("Rejected enemy snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
