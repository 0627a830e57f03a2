//! Outpost AI - Enemy Agents and Population Director
//!
//! Hostile agents for a multiplayer survival shooter, driven by a small
//! finite state machine, plus the director that owns them.
//!
//! # Features
//!
//! - Agent FSM: spawning, patrolling, chasing, attacking, dead, respawning
//! - Player-count driven population economy with annulus spawn search
//! - Wave progression for arena modes
//! - Loot tables, drops, pickup and expiry
//! - Typed event lists for spawn, death, attack, loot and despawn
//! - Flat snapshots for authority replication
//!
//! # Example
//!
//! ```ignore
//! use outpost_ai::prelude::*;
//!
//! let mut director = EnemyDirector::new(
//!     EnemyConfig::default(),
//!     SpawnConfig::default(),
//!     LootConfig::default(),
//!     seed,
//! );
//! director.events_mut().death.subscribe(|e: &DeathEvent| {
//!     log::info!("{} died", e.agent.id);
//! });
//!
//! let report = director.update(TickContext {
//!     delta_time: dt,
//!     players: &players,
//!     terrain: &terrain,
//!     world: &mut world,
//!     player_damage: &mut |player, amount, _agent| hurt(player, amount),
//! });
//! ```

pub mod agent;
pub mod config;
pub mod director;
pub mod error;
pub mod events;
pub mod loot;
pub mod perception;
pub mod snapshot;
pub mod state;
pub mod steering;
pub mod wave;

pub mod prelude {
    pub use crate::agent::{hit_chance, Agent, AgentContext, AgentIntent, DamageOutcome};
    pub use crate::config::{EnemyConfig, LootConfig, LootEntry, SpawnConfig, WaveConfig};
    pub use crate::director::{DirectorTargets, EnemyDirector, PlayerDamageSink, TickContext, TickReport};
    pub use crate::error::SnapshotError;
    pub use crate::events::{
        AttackEvent, DeathEvent, DespawnEvent, DespawnReason, DirectorEvent, DirectorEvents, LootPickupEvent,
        LootSpawnEvent, SpawnEvent,
    };
    pub use crate::loot::{roll_items, LootDrop, LootItem};
    pub use crate::perception::nearest_live_player;
    pub use crate::snapshot::{AgentSnapshot, DirectorSnapshot};
    pub use crate::state::AgentState;
    pub use crate::steering::{arrive, horizontal_distance, seek, yaw_towards};
    pub use crate::wave::{WaveManager, WavePhase, WaveUpdate};
}

pub use prelude::*;
