//! Outpost Runtime - Simulation Host
//!
//! Glues the collision world, the enemy director, combat and replication
//! into one owned [`Simulation`], configured from a single TOML file.
//!
//! # Example
//!
//! ```ignore
//! use outpost_runtime::prelude::*;
//!
//! let config = SimConfig::load()?;
//! let mut sim = Simulation::new(config, seed);
//! sim.add_player(PlayerId(1), Vec3::ZERO);
//!
//! loop {
//!     sim.move_player(PlayerId(1), input_direction, dt);
//!     if trigger_pulled {
//!         sim.fire(PlayerId(1), aim);
//!     }
//!     sim.update(dt);
//! }
//! ```

pub mod config;
pub mod game;
pub mod session;

pub mod prelude {
    pub use crate::config::{ConfigError, GameMode, PlayerConfig, SessionConfig, SimConfig};
    pub use crate::game::{PlayerState, Simulation, StepReport};
    pub use crate::session::{run_session, SessionSummary};
}

pub use prelude::*;
