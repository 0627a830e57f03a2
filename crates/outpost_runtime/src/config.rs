//! Simulation Configuration
//!
//! Every subsystem's tuning in one TOML document. Missing sections and keys
//! take their defaults.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment: `OUTPOST_SEED=42`, `OUTPOST_MODE=waves`
//! 2. Config file named by `OUTPOST_CONFIG`
//! 3. `outpost.toml` in the working directory
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! mode = "waves"
//!
//! [session]
//! seed = 7
//! ticks = 1200
//! players = 2
//!
//! [enemy]
//! chase_radius = 30.0
//!
//! [waves]
//! max_waves = 5
//! ```

use outpost_ai::{EnemyConfig, LootConfig, SpawnConfig, WaveConfig};
use outpost_combat::CombatConfig;
use outpost_physics::CollisionConfig;
use outpost_sync::WireFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed TOML
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Values the simulation cannot run with
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// How the enemy population is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Player-count driven population with respawns
    #[default]
    Survival,
    /// Numbered waves of growing size, no respawns
    Waves,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Survival => write!(f, "survival"),
            Self::Waves => write!(f, "waves"),
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "survival" | "" => Ok(Self::Survival),
            "waves" | "wave" | "arena" => Ok(Self::Waves),
            _ => Err(format!("Unknown game mode: {}", s)),
        }
    }
}

/// Player body tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Collision sphere radius
    pub body_radius: f32,
    /// Body center height above the ground
    pub ground_offset: f32,
    /// Walking speed, units per second
    pub move_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            body_radius: 0.5,
            ground_offset: 1.0,
            move_speed: 5.0,
        }
    }
}

/// Headless session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for every random stream
    pub seed: u64,
    /// Ticks to run
    pub ticks: u32,
    /// Ticks per second
    pub tick_rate: f32,
    /// Scripted players
    pub players: usize,
    /// Encoding used for the replication check
    pub wire_format: WireFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: 600,
            tick_rate: 20.0,
            players: 1,
            wire_format: WireFormat::Json,
        }
    }
}

impl SessionConfig {
    /// Tick length, seconds
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: GameMode,
    pub session: SessionConfig,
    pub player: PlayerConfig,
    pub collision: CollisionConfig,
    pub enemy: EnemyConfig,
    pub spawn: SpawnConfig,
    pub loot: LootConfig,
    pub waves: WaveConfig,
    pub combat: CombatConfig,
    /// Where this config was read from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load from every source: file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("OUTPOST_CONFIG") {
            Ok(path) if !path.is_empty() => {
                let config = Self::load_from_file(&path)?;
                log::info!("Loaded config from {}", path);
                config
            }
            _ if Path::new("outpost.toml").exists() => {
                let config = Self::load_from_file("outpost.toml")?;
                log::info!("Loaded config from outpost.toml");
                config
            }
            _ => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `OUTPOST_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = var("OUTPOST_SEED") {
            match seed.trim().parse() {
                Ok(seed) => {
                    self.session.seed = seed;
                    log::info!("Seed from env: {}", seed);
                }
                Err(_) => log::warn!("Ignoring OUTPOST_SEED={:?}: not a number", seed),
            }
        }

        if let Some(mode) = var("OUTPOST_MODE") {
            match mode.parse() {
                Ok(mode) => {
                    self.mode = mode;
                    log::info!("Mode from env: {}", self.mode);
                }
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        self.collision
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let spawn = &self.spawn;
        if spawn.spawn_min_radius < 0.0 || spawn.spawn_min_radius > spawn.spawn_max_radius {
            return Err(ConfigError::Invalid(format!(
                "spawn radius range {}..{} is inverted or negative",
                spawn.spawn_min_radius, spawn.spawn_max_radius
            )));
        }
        if spawn.spawn_check_interval <= 0.0 {
            return Err(ConfigError::Invalid("spawn_check_interval must be positive".into()));
        }

        let enemy = &self.enemy;
        if !(enemy.max_health > 0.0) {
            return Err(ConfigError::Invalid("enemy max_health must be positive".into()));
        }
        if !(enemy.attack_range > 0.0) || !(enemy.chase_radius > 0.0) {
            return Err(ConfigError::Invalid("enemy ranges must be positive".into()));
        }
        if enemy.hit_radius <= 0.0 || enemy.body_radius <= 0.0 {
            return Err(ConfigError::Invalid("enemy radii must be positive".into()));
        }

        for entry in &self.loot.table {
            if !(0.0..=1.0).contains(&entry.chance) || entry.min_quantity > entry.max_quantity {
                return Err(ConfigError::Invalid(format!("loot entry {:?} is malformed", entry.item)));
            }
        }

        if self.waves.max_spawn_batch == 0 || self.waves.spawn_interval < 0.0 {
            return Err(ConfigError::Invalid("wave spawning must allow at least one agent per batch".into()));
        }

        if !(self.session.tick_rate > 0.0) {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        if !(self.player.body_radius > 0.0) || !(self.player.max_health > 0.0) {
            return Err(ConfigError::Invalid("player radius and health must be positive".into()));
        }

        Ok(())
    }

    /// Log a configuration summary
    pub fn print_summary(&self) {
        log::info!("Simulation Configuration:");
        log::info!("  Mode: {}", self.mode);
        log::info!(
            "  Session: seed={}, ticks={} @ {} Hz, players={}",
            self.session.seed,
            self.session.ticks,
            self.session.tick_rate,
            self.session.players
        );
        log::info!("  Grid cell: {}", self.collision.cell_size);
        match self.mode {
            GameMode::Survival => log::info!(
                "  Spawning: {} per player, threshold {}",
                self.spawn.max_enemies_per_player,
                self.spawn.spawn_threshold
            ),
            GameMode::Waves => log::info!(
                "  Waves: {} (base {}, +{} per wave)",
                self.waves.max_waves,
                self.waves.base_enemies,
                self.waves.enemies_per_wave
            ),
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("survival".parse::<GameMode>().unwrap(), GameMode::Survival);
        assert_eq!("Waves".parse::<GameMode>().unwrap(), GameMode::Waves);
        assert!("deathmatch".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, GameMode::Survival);
        assert_eq!(config.session.wire_format, WireFormat::Json);
    }

    #[test]
    fn test_partial_toml() {
        let config = SimConfig::from_toml_str(
            r#"
            mode = "waves"

            [session]
            seed = 9

            [enemy]
            chase_radius = 30.0
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, GameMode::Waves);
        assert_eq!(config.session.seed, 9);
        assert_eq!(config.session.ticks, 600);
        assert_eq!(config.enemy.chase_radius, 30.0);
        assert_eq!(config.enemy.max_health, 100.0);
    }

    #[test]
    fn test_rejects_inverted_spawn_radius() {
        let result = SimConfig::from_toml_str(
            r#"
            [spawn]
            spawn_min_radius = 50.0
            spawn_max_radius = 10.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        let result = SimConfig::from_toml_str("[collision]\ncell_size = 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(matches!(
            SimConfig::from_toml_str(r#"mode = "chaos""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SimConfig::default();
        config.apply_overrides(|key| match key {
            "OUTPOST_SEED" => Some("1234".to_string()),
            "OUTPOST_MODE" => Some("waves".to_string()),
            _ => None,
        });
        assert_eq!(config.session.seed, 1234);
        assert_eq!(config.mode, GameMode::Waves);

        config.apply_overrides(|key| (key == "OUTPOST_SEED").then(|| "nope".to_string()));
        assert_eq!(config.session.seed, 1234);
    }
}
