//! Outpost Physics - Grid Broad Phase and Sphere Collision
//!
//! Lightweight collision for moving bodies (players, hostile agents) against
//! static and semi-static world content. There is no rigid-body dynamics:
//! bodies are spheres that get pushed out of whatever they overlap.
//!
//! # Features
//!
//! - Uniform XZ grid broad phase with 3x3 neighborhood queries
//! - Sphere vs sphere and sphere vs box narrow phase
//! - Iterative push-out with velocity clipping and damping
//! - Terrain ground check with slope estimation
//! - Standable props (crates, ledges) a body can step onto
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              CollisionWorld              │
//! │  ┌──────────────┐   ┌─────────────────┐  │
//! │  │ WorldObjects │   │  SpatialIndex   │  │
//! │  │  (by id)     │   │ (cell -> ids)   │  │
//! │  └──────────────┘   └─────────────────┘  │
//! └──────────────────────────────────────────┘
//!          │                    │
//!          ▼                    ▼
//!   resolve_sphere       ground_check
//!   resolve_movement     standable_surface
//! ```
//!
//! # Example
//!
//! ```ignore
//! use outpost_physics::prelude::*;
//!
//! let mut world = CollisionWorld::new(CollisionConfig::default());
//! world.insert_object(WorldObject::barrier(
//!     ObjectId::World(1),
//!     Vec3::ZERO,
//!     Bounds::cuboid(2.0, 2.0, 2.0),
//! ))?;
//!
//! let proposed = position + velocity * dt;
//! let moved = world.resolve_movement(proposed, 0.5, velocity, &[]);
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod ground;
pub mod object;
pub mod resolver;
pub mod world;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::config::CollisionConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::grid::{CellKey, SpatialIndex};
    pub use crate::ground::{estimate_slope, GroundInfo, SlopeInfo, SurfaceHeight};
    pub use crate::object::{Bounds, ObjectKind, WorldObject};
    pub use crate::resolver::{MovementResult, SphereContact};
    pub use crate::world::CollisionWorld;
    pub use outpost_core::ObjectId;
}

pub use prelude::*;
