//! Outpost Sync - Authority Replication Contract
//!
//! Wire contract between the authoritative simulation and its replicas.
//!
//! # Features
//!
//! - Tagged message union: enemy state, weapon discharges, equipment
//! - Versioned, sequenced envelopes
//! - JSON and bincode encodings
//! - Stale and version-mismatched messages rejected whole
//!
//! # Example
//!
//! ```ignore
//! use outpost_sync::prelude::*;
//!
//! // Authority
//! let mut bridge = AuthorityBridge::new(WireFormat::Json);
//! let bytes = bridge.export_enemy_state(&director)?;
//!
//! // Replica
//! let mut bridge = AuthorityBridge::new(WireFormat::Json);
//! bridge.apply(&bytes, &mut director, &mut world)?;
//! ```

pub mod bridge;
pub mod error;
pub mod message;
pub mod wire;

pub mod prelude {
    pub use crate::bridge::AuthorityBridge;
    pub use crate::error::{Result, SyncError};
    pub use crate::message::{Envelope, SyncMessage, ToolKind, PROTOCOL_VERSION};
    pub use crate::wire::WireFormat;
}

pub use prelude::*;
