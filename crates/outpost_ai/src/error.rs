//! Snapshot import errors

use outpost_core::{AgentId, LootId};
use thiserror::Error;

/// Reasons a director snapshot is rejected. Rejection is all-or-nothing:
/// the live set is untouched when any of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    /// The same agent id appears twice
    #[error("Duplicate agent in snapshot: {0}")]
    DuplicateAgent(AgentId),

    /// The same loot id appears twice
    #[error("Duplicate loot drop in snapshot: {0}")]
    DuplicateLoot(LootId),

    /// An agent record breaks the data model
    #[error("Invalid agent {id}: {reason}")]
    InvalidAgent { id: AgentId, reason: &'static str },

    /// A loot record breaks the data model
    #[error("Invalid loot drop {id}: {reason}")]
    InvalidLoot { id: LootId, reason: &'static str },

    /// Snapshot clock is not a finite, non-negative time
    #[error("Invalid snapshot clock: {0}")]
    InvalidClock(f64),

    /// The director was disposed
    #[error("Director has been disposed")]
    Disposed,
}

/// Result type for snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;
