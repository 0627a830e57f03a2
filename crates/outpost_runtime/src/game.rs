//! Simulation host
//!
//! Owns the collision world, the enemy director and the players, and wires
//! them together the way a game server tick would: players move, the
//! director runs, waves advance, shots resolve against live agents.

use crate::config::{GameMode, SimConfig};
use glam::Vec3;
use outpost_ai::{
    DirectorEvent, DirectorSnapshot, EnemyDirector, LootDrop, SnapshotError, TickContext, TickReport, WaveManager,
    WaveUpdate,
};
use outpost_combat::{CombatResolver, FireResult, WeaponStats};
use outpost_core::{AgentId, FlatGround, HeightField, PlayerId, PlayerInfo};
use outpost_event::EventChannel;
use outpost_physics::{CollisionWorld, MovementResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Server-side state of one player
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Snapshot handed to the director every tick (position is the feet)
    pub info: PlayerInfo,
    pub velocity: Vec3,
    pub grounded: bool,
    pub weapon: WeaponStats,
    pub kills: u32,
    pub damage_taken: f32,
}

/// What happened during one simulation step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub tick: TickReport,
    /// Wave progress, in wave mode
    pub wave: Option<WaveUpdate>,
    /// Players whose health reached zero this step
    pub players_downed: Vec<PlayerId>,
}

/// One running match
pub struct Simulation {
    config: SimConfig,
    world: CollisionWorld,
    director: EnemyDirector,
    combat: CombatResolver,
    waves: Option<WaveManager>,
    players: BTreeMap<PlayerId, PlayerState>,
    terrain: Box<dyn HeightField>,
    /// Spread rolls for player weapons
    rng: ChaCha8Rng,
    events: EventChannel<DirectorEvent>,
    disposed: bool,
}

impl Simulation {
    /// Create a simulation on flat ground.
    ///
    /// Wave mode disables automatic population and respawns; the wave
    /// manager drives spawning instead.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut enemy = config.enemy.clone();
        let mut spawn = config.spawn.clone();

        let waves = match config.mode {
            GameMode::Survival => None,
            GameMode::Waves => {
                enemy.respawn_enabled = false;
                spawn.auto_populate = false;
                let mut waves = WaveManager::new(config.waves.clone());
                waves.start();
                Some(waves)
            }
        };

        let mut director = EnemyDirector::new(enemy, spawn, config.loot.clone(), seed);
        let events = EventChannel::new();
        director.events_mut().all.forward_to(events.sender());

        log::info!("Simulation created ({} mode, seed {})", config.mode, seed);

        Self {
            world: CollisionWorld::new(config.collision.clone()),
            combat: CombatResolver::new(config.combat.clone()),
            director,
            waves,
            players: BTreeMap::new(),
            terrain: Box::new(FlatGround::default()),
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            events,
            disposed: false,
            config,
        }
    }

    /// Replace the ground sampler
    pub fn with_terrain(mut self, terrain: impl HeightField + 'static) -> Self {
        self.terrain = Box::new(terrain);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// Simulation clock, seconds
    pub fn clock(&self) -> f64 {
        self.director.clock()
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Collision world, for placing level geometry
    pub fn world_mut(&mut self) -> &mut CollisionWorld {
        &mut self.world
    }

    pub fn director(&self) -> &EnemyDirector {
        &self.director
    }

    /// Director, for subscribing to its events
    pub fn director_mut(&mut self) -> &mut EnemyDirector {
        &mut self.director
    }

    pub fn waves(&self) -> Option<&WaveManager> {
        self.waves.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Add a player standing on the ground at (x, z) of `position`
    pub fn add_player(&mut self, id: PlayerId, position: Vec3) -> bool {
        if self.disposed {
            return false;
        }
        if self.players.contains_key(&id) {
            log::warn!("{} is already connected", id);
            return false;
        }

        let ground = self.terrain.sample(position.x, position.z);
        let feet = Vec3::new(position.x, ground, position.z);
        let state = PlayerState {
            info: PlayerInfo::new(id, feet).with_health(self.config.player.max_health),
            velocity: Vec3::ZERO,
            grounded: true,
            weapon: WeaponStats::default(),
            kills: 0,
            damage_taken: 0.0,
        };
        self.players.insert(id, state);
        log::info!("{} joined at {:?}", id, feet);
        true
    }

    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let removed = self.players.remove(&id).is_some();
        if removed {
            log::info!("{} left", id);
        }
        removed
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    /// Per-tick snapshot of every connected player
    pub fn player_infos(&self) -> Vec<PlayerInfo> {
        self.players.values().map(|p| p.info).collect()
    }

    /// Change a player's weapon
    pub fn equip(&mut self, id: PlayerId, weapon: WeaponStats) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.weapon = weapon;
                true
            }
            None => false,
        }
    }

    /// Walk a player along the horizontal part of `direction`.
    ///
    /// The body is pushed out of the world, then snapped onto the terrain or
    /// the highest standable prop within step height. Dead or unknown
    /// players do not move.
    pub fn move_player(&mut self, id: PlayerId, direction: Vec3, delta_time: f32) -> Option<MovementResult> {
        if self.disposed {
            return None;
        }
        let settings = &self.config.player;
        let player = self.players.get_mut(&id)?;
        if !player.info.is_alive {
            return None;
        }

        let heading = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        let velocity = heading * settings.move_speed;
        let center = player.info.position + Vec3::Y * settings.ground_offset;
        let proposed = center + velocity * delta_time.max(0.0);

        let moved = self
            .world
            .resolve_movement(proposed, settings.body_radius, velocity, &[]);
        // standable_surface measures step reach from the sphere bottom, so
        // place the sphere with its bottom on the feet
        let feet_sphere = moved.position - Vec3::Y * (settings.ground_offset - settings.body_radius);
        let surface = self
            .world
            .standable_surface(feet_sphere, settings.body_radius, self.terrain.as_ref());

        player.info.position = Vec3::new(moved.position.x, surface.height, moved.position.z);
        player.velocity = moved.velocity;
        player.grounded = true;
        Some(moved)
    }

    /// Advance the whole simulation by one tick
    pub fn update(&mut self, delta_time: f32) -> StepReport {
        let mut report = StepReport::default();
        if self.disposed {
            return report;
        }

        let infos = self.player_infos();
        let players = &mut self.players;
        let downed = &mut report.players_downed;
        let mut damage = |target: PlayerId, amount: f32, source: AgentId| {
            let Some(player) = players.get_mut(&target) else {
                return;
            };
            if !player.info.is_alive {
                return;
            }
            player.info.health = (player.info.health - amount).max(0.0);
            player.damage_taken += amount;
            if player.info.health <= 0.0 {
                player.info.is_alive = false;
                downed.push(target);
                log::info!("{} downed by {}", target, source);
            }
        };

        report.tick = self.director.update(TickContext {
            delta_time,
            players: &infos,
            terrain: self.terrain.as_ref(),
            world: &mut self.world,
            player_damage: &mut damage,
        });

        if let Some(waves) = self.waves.as_mut() {
            let update = waves.update(delta_time, self.director.alive_count());
            if update.spawn_request > 0 {
                let spawned = self.director.spawn_batch(
                    update.spawn_request as usize,
                    &infos,
                    self.terrain.as_ref(),
                    &mut self.world,
                );
                waves.confirm_spawned(spawned.len() as u32);
                report.tick.spawned.extend(spawned);
            }
            report.wave = Some(update);
        }

        report
    }

    /// Fire a player's weapon from body height along `direction`.
    ///
    /// Returns `None` for unknown or dead shooters.
    pub fn fire(&mut self, shooter: PlayerId, direction: Vec3) -> Option<FireResult> {
        if self.disposed {
            return None;
        }
        let player = self.players.get(&shooter)?;
        if !player.info.is_alive {
            return None;
        }
        let origin = player.info.position + Vec3::Y * self.config.player.ground_offset;
        let weapon = player.weapon.clone();

        let result = {
            let mut targets = self.director.targets(&mut self.world);
            self.combat
                .fire(origin, direction, &weapon, Some(shooter), &mut targets, &mut self.rng)
        };

        let kills = result.hits.iter().filter(|h| h.lethal).count() as u32;
        if kills > 0 {
            if let Some(player) = self.players.get_mut(&shooter) {
                player.kills += kills;
            }
            if let Some(waves) = self.waves.as_mut() {
                for _ in 0..kills {
                    waves.record_kill();
                }
            }
        }
        Some(result)
    }

    /// Place an agent on the ground at (x, z) of `position`
    pub fn spawn_enemy_at(&mut self, position: Vec3) -> Option<AgentId> {
        let ground = self.terrain.sample(position.x, position.z);
        let center = Vec3::new(
            position.x,
            ground + self.director.enemy_config().ground_offset,
            position.z,
        );
        self.director.spawn_agent_at(center, &mut self.world)
    }

    /// Pick up every drop the player is standing in
    pub fn collect_loot(&mut self, id: PlayerId) -> Vec<LootDrop> {
        let Some(player) = self.players.get(&id).filter(|p| p.info.is_alive) else {
            return Vec::new();
        };
        let position = player.info.position;

        self.director
            .loot_near(position, self.config.player.body_radius, &self.world)
            .into_iter()
            .filter_map(|loot| self.director.pickup_loot(loot, id, &mut self.world))
            .collect()
    }

    /// Enemy live set for replication
    pub fn export_state(&self) -> DirectorSnapshot {
        self.director.export_state()
    }

    /// Replace the enemy live set
    pub fn import_state(&mut self, snapshot: &DirectorSnapshot) -> Result<(), SnapshotError> {
        self.director.import_state(snapshot, &mut self.world)
    }

    /// Director events since the last drain
    pub fn drain_events(&self) -> Vec<DirectorEvent> {
        self.events.drain()
    }

    /// Tear everything down. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.director.dispose(&mut self.world);
        self.world.clear();
        self.players.clear();
        self.disposed = true;
        log::info!("Simulation disposed");
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("mode", &self.config.mode)
            .field("players", &self.players.len())
            .field("director", &self.director)
            .field("disposed", &self.disposed)
            .finish()
    }
}
