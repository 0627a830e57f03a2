//! Authority bridge
//!
//! The authoritative participant exports sequenced envelopes; replicas apply
//! them in order. The transport is somebody else's problem.

use crate::error::{Result, SyncError};
use crate::message::{Envelope, SyncMessage, ToolKind};
use crate::wire::WireFormat;
use outpost_ai::EnemyDirector;
use outpost_combat::{Trail, WeaponKind};
use outpost_core::PlayerId;
use outpost_physics::CollisionWorld;

/// One end of the replication link
#[derive(Debug, Clone)]
pub struct AuthorityBridge {
    format: WireFormat,
    next_sequence: u64,
    last_applied: Option<u64>,
}

impl AuthorityBridge {
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            next_sequence: 1,
            last_applied: None,
        }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Sequence of the newest message applied on this end
    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    /// Forget the applied sequence, e.g. after the authority changed hands
    pub fn reset(&mut self) {
        self.last_applied = None;
    }

    /// Wrap and encode a message with the next sequence number
    pub fn send(&mut self, message: SyncMessage) -> Result<Vec<u8>> {
        let envelope = Envelope::new(self.next_sequence, message);
        let bytes = self.format.encode(&envelope)?;
        log::trace!(
            "Encoded {} #{} ({} bytes)",
            envelope.message.kind(),
            envelope.sequence,
            bytes.len()
        );
        self.next_sequence += 1;
        Ok(bytes)
    }

    /// Export the director's live set
    pub fn export_enemy_state(&mut self, director: &EnemyDirector) -> Result<Vec<u8>> {
        self.send(SyncMessage::EnemyState(director.export_state()))
    }

    /// Export a shot for remote presentation
    pub fn export_weapon_fired(&mut self, shooter: PlayerId, weapon: WeaponKind, trail: Trail) -> Result<Vec<u8>> {
        self.send(SyncMessage::WeaponFired { shooter, weapon, trail })
    }

    /// Export what a player is holding
    pub fn export_equipment(&mut self, player: PlayerId, weapon: WeaponKind, tool: Option<ToolKind>) -> Result<Vec<u8>> {
        self.send(SyncMessage::Equipment { player, weapon, tool })
    }

    /// Decode a message and check its ordering without applying anything.
    ///
    /// The sequence is recorded as applied; use [`apply`](Self::apply) for
    /// enemy state so a rejected snapshot does not advance it.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<SyncMessage> {
        let envelope = self.accept(bytes)?;
        self.last_applied = Some(envelope.sequence);
        Ok(envelope.message)
    }

    /// Decode a message and apply it.
    ///
    /// Enemy state replaces the director's live set. Other messages are
    /// returned for the caller to present. On any error the director and
    /// the applied sequence are unchanged.
    pub fn apply(&mut self, bytes: &[u8], director: &mut EnemyDirector, world: &mut CollisionWorld) -> Result<SyncMessage> {
        let envelope = self.accept(bytes)?;
        if let SyncMessage::EnemyState(snapshot) = &envelope.message {
            director.import_state(snapshot, world)?;
            log::debug!(
                "Applied enemy state #{}: {} agents, {} loot drops",
                envelope.sequence,
                snapshot.agents.len(),
                snapshot.loot_drops.len()
            );
        }
        self.last_applied = Some(envelope.sequence);
        Ok(envelope.message)
    }

    fn accept(&self, bytes: &[u8]) -> Result<Envelope> {
        let envelope = self.format.decode(bytes)?;
        if let Some(last) = self.last_applied {
            if envelope.sequence <= last {
                log::warn!("Dropping stale {} #{} (last {})", envelope.message.kind(), envelope.sequence, last);
                return Err(SyncError::StaleSequence {
                    sequence: envelope.sequence,
                    last,
                });
            }
        }
        Ok(envelope)
    }
}

impl Default for AuthorityBridge {
    fn default() -> Self {
        Self::new(WireFormat::default())
    }
}
