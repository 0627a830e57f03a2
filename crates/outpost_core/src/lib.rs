//! # outpost_core - Shared Simulation Primitives
//!
//! Small, dependency-light types every other Outpost crate agrees on:
//! - **Identifiers**: typed ids for agents, players, loot and world objects
//! - **Players**: the per-tick [`PlayerInfo`] snapshot handed to the simulation
//! - **Terrain**: the [`HeightField`] sampler consumed by collision and spawning
//!
//! Nothing in here owns simulation state; the types are plain values that
//! cross crate boundaries.

pub mod id;
pub mod player;
pub mod terrain;

pub use id::*;
pub use player::*;
pub use terrain::*;

pub use glam::Vec3;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{AgentId, IdGenerator, LootId, ObjectId, PlayerId};
    pub use crate::player::PlayerInfo;
    pub use crate::terrain::{FlatGround, HeightField};
    pub use glam::Vec3;
}
