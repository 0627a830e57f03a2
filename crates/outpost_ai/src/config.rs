//! Enemy, spawn, loot and wave tuning
//!
//! Distances are world units, times are seconds of simulation clock.

use serde::{Deserialize, Serialize};

/// Per-agent behavior tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Health of a fresh agent
    pub max_health: f32,
    /// Radius of the sphere player shots are tested against
    pub hit_radius: f32,
    /// Radius of the collision body
    pub body_radius: f32,
    /// Height of the body center above the terrain
    pub ground_offset: f32,
    /// Walking speed while patrolling
    pub patrol_speed: f32,
    /// Running speed while chasing
    pub chase_speed: f32,
    /// Distance at which a patrolling agent notices players
    pub chase_radius: f32,
    /// Distance at which a chasing agent starts attacking
    pub attack_range: f32,
    /// Seconds between attack rolls
    pub attack_cooldown: f64,
    /// Damage of a successful attack
    pub attack_damage: f32,
    /// Patrol targets are picked within this distance of the spawn point
    pub patrol_radius: f32,
    /// Patrol target counts as reached within this distance
    pub arrival_distance: f32,
    /// Dead agents come back after `respawn_delay`
    pub respawn_enabled: bool,
    /// Seconds between death and respawn
    pub respawn_delay: f64,
    /// Respawns land within this distance of the original spawn point
    pub respawn_scatter: f32,
    /// Seconds a corpse stays in the live set when respawning is disabled
    pub corpse_lifetime: f64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            hit_radius: 0.8,
            body_radius: 0.5,
            ground_offset: 1.0,
            patrol_speed: 2.0,
            chase_speed: 4.5,
            chase_radius: 25.0,
            attack_range: 2.5,
            attack_cooldown: 1.5,
            attack_damage: 10.0,
            patrol_radius: 20.0,
            arrival_distance: 1.0,
            respawn_enabled: true,
            respawn_delay: 10.0,
            respawn_scatter: 5.0,
            corpse_lifetime: 5.0,
        }
    }
}

impl EnemyConfig {
    /// Set starting health
    pub fn with_max_health(mut self, health: f32) -> Self {
        self.max_health = health;
        self
    }

    /// Set the aggro radius
    pub fn with_chase_radius(mut self, radius: f32) -> Self {
        self.chase_radius = radius;
        self
    }

    /// Enable or disable respawning
    pub fn with_respawn(mut self, enabled: bool) -> Self {
        self.respawn_enabled = enabled;
        self
    }
}

/// Population economy tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Keep the population topped up automatically
    pub auto_populate: bool,
    /// At this many connected players all agents are offloaded
    pub spawn_threshold: usize,
    /// Target population per connected player
    pub max_enemies_per_player: usize,
    /// Most agents created per spawn check
    pub max_spawn_batch: usize,
    /// Seconds between spawn checks
    pub spawn_check_interval: f64,
    /// Candidate points tried per spawn
    pub spawn_attempts: u32,
    /// Inner radius of the spawn annulus around a player
    pub spawn_min_radius: f32,
    /// Outer radius of the spawn annulus
    pub spawn_max_radius: f32,
    /// Minimum distance from every player and agent
    pub min_spawn_separation: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            auto_populate: true,
            spawn_threshold: 4,
            max_enemies_per_player: 5,
            max_spawn_batch: 3,
            spawn_check_interval: 5.0,
            spawn_attempts: 10,
            spawn_min_radius: 20.0,
            spawn_max_radius: 40.0,
            min_spawn_separation: 10.0,
        }
    }
}

impl SpawnConfig {
    /// Population target for a player count (at least 1)
    pub fn target_population(&self, connected_players: usize) -> usize {
        (connected_players * self.max_enemies_per_player).max(1)
    }

    /// Enable or disable automatic population
    pub fn with_auto_populate(mut self, enabled: bool) -> Self {
        self.auto_populate = enabled;
        self
    }

    /// Set the spawn annulus
    pub fn with_radius(mut self, min: f32, max: f32) -> Self {
        self.spawn_min_radius = min;
        self.spawn_max_radius = max;
        self
    }

    /// Set the minimum spawn separation
    pub fn with_separation(mut self, separation: f32) -> Self {
        self.min_spawn_separation = separation;
        self
    }
}

/// One line of a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item kind
    pub item: String,
    /// Independent drop chance (0..=1)
    pub chance: f64,
    /// Inclusive quantity range
    pub min_quantity: u32,
    pub max_quantity: u32,
}

impl LootEntry {
    pub fn new(item: impl Into<String>, chance: f64, min_quantity: u32, max_quantity: u32) -> Self {
        Self {
            item: item.into(),
            chance,
            min_quantity,
            max_quantity,
        }
    }
}

/// Loot tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Entries rolled on every death
    pub table: Vec<LootEntry>,
    /// Seconds before an untouched drop disappears
    pub loot_lifetime: f64,
    /// Radius of the pickup volume
    pub pickup_radius: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            table: vec![
                LootEntry::new("scrap", 1.0, 1, 3),
                LootEntry::new("ammo", 0.5, 5, 15),
                LootEntry::new("medkit", 0.1, 1, 1),
            ],
            loot_lifetime: 60.0,
            pickup_radius: 1.5,
        }
    }
}

/// Wave progression tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies in wave 1
    pub base_enemies: u32,
    /// Extra enemies per subsequent wave
    pub enemies_per_wave: u32,
    /// Cap on any wave's target
    pub max_enemies_per_wave: u32,
    /// Last wave
    pub max_waves: u32,
    /// Seconds between a cleared wave and the next one
    pub wave_cooldown: f32,
    /// Seconds between spawn batches within a wave
    pub spawn_interval: f32,
    /// Most agents requested per batch
    pub max_spawn_batch: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemies: 5,
            enemies_per_wave: 3,
            max_enemies_per_wave: 30,
            max_waves: 20,
            wave_cooldown: 10.0,
            spawn_interval: 2.0,
            max_spawn_batch: 3,
        }
    }
}
