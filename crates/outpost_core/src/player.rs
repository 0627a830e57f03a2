//! Player snapshots supplied by the movement subsystem each tick

use crate::id::PlayerId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Read-only view of a connected player for one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Player id
    pub id: PlayerId,
    /// World position (feet)
    pub position: Vec3,
    /// Current health
    pub health: f32,
    /// Whether the player can currently be targeted
    pub is_alive: bool,
}

impl PlayerInfo {
    /// Create a live player at a position with full health
    pub fn new(id: PlayerId, position: Vec3) -> Self {
        Self {
            id,
            position,
            health: 100.0,
            is_alive: true,
        }
    }

    /// Set health
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self.is_alive = health > 0.0;
        self
    }

    /// Mark as dead
    pub fn dead(mut self) -> Self {
        self.health = 0.0;
        self.is_alive = false;
        self
    }

    /// Horizontal (XZ-plane) distance to a point
    pub fn horizontal_distance(&self, point: Vec3) -> f32 {
        let dx = self.position.x - point.x;
        let dz = self.position.z - point.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Find a player by id in a tick snapshot
pub fn find_player(players: &[PlayerInfo], id: PlayerId) -> Option<&PlayerInfo> {
    players.iter().find(|p| p.id == id)
}
