//! Replicated messages
//!
//! Variant names and field names are the wire schema. Enum tags are
//! snake_case strings in text encodings.

use outpost_ai::DirectorSnapshot;
use outpost_combat::{Trail, WeaponKind};
use outpost_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Current protocol version
pub const PROTOCOL_VERSION: u32 = 1;

/// Building and gathering tools a player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Hammer,
    Axe,
    Pickaxe,
}

/// One replicated fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMessage {
    /// Full enemy live set
    EnemyState(DirectorSnapshot),
    /// A shot for remote presentation
    WeaponFired {
        shooter: PlayerId,
        weapon: WeaponKind,
        trail: Trail,
    },
    /// What a player is holding
    Equipment {
        player: PlayerId,
        weapon: WeaponKind,
        tool: Option<ToolKind>,
    },
}

impl SyncMessage {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EnemyState(_) => "enemy_state",
            Self::WeaponFired { .. } => "weapon_fired",
            Self::Equipment { .. } => "equipment",
        }
    }
}

/// Versioned, ordered wrapper around a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Protocol version of the sender
    pub version: u32,
    /// Per-sender sequence number, strictly increasing
    pub sequence: u64,
    pub message: SyncMessage,
}

impl Envelope {
    /// Wrap a message at the current protocol version
    pub fn new(sequence: u64, message: SyncMessage) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            sequence,
            message,
        }
    }
}
