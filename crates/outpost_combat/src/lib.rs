//! Outpost Combat - Fire Resolution, Health and Damage
//!
//! # Features
//!
//! - Hitscan and scatter (multi-pellet) weapons
//! - Accuracy-derived spread cones, seeded for reproducible rolls
//! - Ray vs hit-sphere tests keeping the closest hit per ray
//! - Clamp-at-zero health pools
//!
//! The resolver knows nothing about who owns the targets. It reads them and
//! applies damage through the [`CombatTargets`] trait.
//!
//! # Example
//!
//! ```ignore
//! use outpost_combat::prelude::*;
//!
//! let resolver = CombatResolver::new(CombatConfig::default());
//! let weapon = WeaponStats::hitscan(25.0, 100.0).with_accuracy(1.0);
//!
//! let result = resolver.fire(muzzle, aim, &weapon, Some(player), &mut director, &mut rng);
//! for hit in &result.hits {
//!     println!("{} took {} (lethal: {})", hit.agent_id, hit.damage, hit.lethal);
//! }
//! ```

pub mod config;
pub mod damage;
pub mod health;
pub mod resolver;
pub mod target;
pub mod weapon;

pub mod prelude {
    pub use crate::config::CombatConfig;
    pub use crate::damage::DamageInfo;
    pub use crate::health::Health;
    pub use crate::resolver::{apply_spread, CombatResolver, FireResult, HitRecord, Trail};
    pub use crate::target::{ray_sphere_hit, CombatTargets, DamageResponse, TargetInfo};
    pub use crate::weapon::{WeaponKind, WeaponStats};
}

pub use prelude::*;
