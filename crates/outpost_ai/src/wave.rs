//! Wave progression layered over the director
//!
//! The manager only counts: it asks for spawns and is told about kills and
//! successful spawns. The director does the actual spawning.

use crate::config::WaveConfig;
use serde::{Deserialize, Serialize};

/// Where the wave cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    /// Not started
    #[default]
    Idle,
    /// Spawning and fighting
    Active,
    /// Between a cleared wave and the next
    Cooldown,
    /// Final wave cleared
    Completed,
}

/// Result of advancing the wave timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveUpdate {
    /// Agents to spawn now
    pub spawn_request: u32,
    /// Wave that began this update
    pub started: Option<u32>,
    /// Wave that was cleared this update
    pub cleared: Option<u32>,
    /// The final wave was cleared this update
    pub completed: bool,
}

/// Wave counter and timers
#[derive(Debug, Clone)]
pub struct WaveManager {
    config: WaveConfig,
    phase: WavePhase,
    wave: u32,
    target: u32,
    spawned: u32,
    kills: u32,
    spawn_timer: f32,
    cooldown_timer: f32,
}

impl WaveManager {
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            phase: WavePhase::Idle,
            wave: 0,
            target: 0,
            spawned: 0,
            kills: 0,
            spawn_timer: 0.0,
            cooldown_timer: 0.0,
        }
    }

    /// Enemy target for wave `wave` (1-based)
    pub fn target_for(&self, wave: u32) -> u32 {
        if wave == 0 {
            return 0;
        }
        let extra = (wave - 1).saturating_mul(self.config.enemies_per_wave);
        self.config
            .base_enemies
            .saturating_add(extra)
            .min(self.config.max_enemies_per_wave)
    }

    /// Begin wave 1. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != WavePhase::Idle {
            return false;
        }
        if self.config.max_waves == 0 {
            self.phase = WavePhase::Completed;
            return false;
        }
        self.begin_wave(1);
        true
    }

    fn begin_wave(&mut self, wave: u32) {
        self.wave = wave;
        self.target = self.target_for(wave);
        self.spawned = 0;
        self.kills = 0;
        self.spawn_timer = 0.0;
        self.phase = WavePhase::Active;
        log::info!("Wave {} started ({} enemies)", wave, self.target);
    }

    /// Count a kill toward the current wave
    pub fn record_kill(&mut self) {
        if self.phase == WavePhase::Active {
            self.kills += 1;
        }
    }

    /// Report agents actually spawned for the current wave
    pub fn confirm_spawned(&mut self, count: u32) {
        if self.phase == WavePhase::Active {
            self.spawned = self.spawned.saturating_add(count).min(self.target);
        }
    }

    /// Advance timers. `alive` is the number of live agents.
    pub fn update(&mut self, delta_time: f32, alive: usize) -> WaveUpdate {
        let mut update = WaveUpdate::default();
        let dt = delta_time.max(0.0);

        match self.phase {
            WavePhase::Idle | WavePhase::Completed => {}
            WavePhase::Active => {
                if self.kills >= self.target && alive == 0 {
                    update.cleared = Some(self.wave);
                    log::info!("Wave {} cleared", self.wave);
                    if self.wave >= self.config.max_waves {
                        self.phase = WavePhase::Completed;
                        update.completed = true;
                        log::info!("All {} waves cleared", self.config.max_waves);
                    } else {
                        self.phase = WavePhase::Cooldown;
                        self.cooldown_timer = self.config.wave_cooldown;
                    }
                    return update;
                }

                if self.spawned < self.target {
                    self.spawn_timer -= dt;
                    if self.spawn_timer <= 0.0 {
                        update.spawn_request = (self.target - self.spawned).min(self.config.max_spawn_batch);
                        self.spawn_timer = self.config.spawn_interval;
                    }
                }
            }
            WavePhase::Cooldown => {
                self.cooldown_timer -= dt;
                if self.cooldown_timer <= 0.0 {
                    self.begin_wave(self.wave + 1);
                    update.started = Some(self.wave);
                }
            }
        }
        update
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Current wave number, 0 before the first
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Target of the current wave
    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn is_completed(&self) -> bool {
        self.phase == WavePhase::Completed
    }
}
