//! Enemy agent state machine

use crate::config::EnemyConfig;
use crate::perception::nearest_live_player;
use crate::state::AgentState;
use crate::steering::{arrive, horizontal_distance, seek, yaw_towards};
use glam::Vec3;
use outpost_combat::Health;
use outpost_core::{find_player, AgentId, HeightField, PlayerId, PlayerInfo};
use rand::Rng;
use std::f32::consts::TAU;

/// Everything an agent reads during its tick
pub struct AgentContext<'a> {
    /// Simulation clock, seconds
    pub now: f64,
    /// Tick length, seconds
    pub delta_time: f32,
    /// Player snapshot for this tick
    pub players: &'a [PlayerInfo],
    /// Ground sampler
    pub terrain: &'a dyn HeightField,
    /// Behavior tuning
    pub config: &'a EnemyConfig,
}

/// What an agent asks its owner to do after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentIntent {
    /// Nothing to apply
    Hold,
    /// Move with this horizontal velocity for the tick
    Move { velocity: Vec3 },
    /// A successful attack roll against a player
    Strike { target: PlayerId, damage: f32 },
    /// Came back from the dead at a new position
    Respawned,
}

/// Result of applying damage to an agent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: f32,
    /// This hit killed the agent
    pub lethal: bool,
    /// The agent adopted the attacker as its target
    pub aggro: bool,
}

/// Hit chance of an attack at `distance`: `max(0.3, 1 - distance / attack_range)`
pub fn hit_chance(distance: f32, attack_range: f32) -> f32 {
    (1.0 - distance / attack_range).max(0.3).min(1.0)
}

/// A hostile agent
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    /// Body center
    pub position: Vec3,
    /// Facing, radians around +Y (0 faces +Z)
    pub yaw: f32,
    pub health: Health,
    pub state: AgentState,
    /// Player being chased or attacked; looked up by id every tick
    pub target: Option<PlayerId>,
    /// Where the agent first appeared; respawns and patrols stay near it
    pub spawn_point: Vec3,
    pub patrol_target: Vec3,
    pub last_attack_time: Option<f64>,
    pub last_update_time: f64,
    pub is_alive: bool,
    pub death_time: Option<f64>,
}

impl Agent {
    /// A fresh agent in `Spawning`
    pub fn new(id: AgentId, position: Vec3, config: &EnemyConfig, now: f64) -> Self {
        Self {
            id,
            position,
            yaw: 0.0,
            health: Health::new(config.max_health),
            state: AgentState::Spawning,
            target: None,
            spawn_point: position,
            patrol_target: position,
            last_attack_time: None,
            last_update_time: now,
            is_alive: true,
            death_time: None,
        }
    }

    /// Advance the state machine by one tick. At most one state transition
    /// happens per call.
    pub fn tick<R: Rng + ?Sized>(&mut self, ctx: &AgentContext<'_>, rng: &mut R) -> AgentIntent {
        self.last_update_time = ctx.now;

        match self.state {
            AgentState::Spawning => {
                self.patrol_target = self.random_patrol_target(ctx, rng);
                self.set_state(AgentState::Patrolling);
                AgentIntent::Hold
            }
            AgentState::Patrolling => self.tick_patrol(ctx, rng),
            AgentState::Chasing => self.tick_chase(ctx),
            AgentState::Attacking => self.tick_attack(ctx, rng),
            AgentState::Dead => self.tick_dead(ctx, rng),
            AgentState::Respawning => {
                self.set_state(AgentState::Spawning);
                AgentIntent::Hold
            }
        }
    }

    fn tick_patrol<R: Rng + ?Sized>(&mut self, ctx: &AgentContext<'_>, rng: &mut R) -> AgentIntent {
        let config = ctx.config;

        if let Some((player, _)) = nearest_live_player(self.position, ctx.players, config.chase_radius) {
            self.target = Some(player.id);
            self.yaw = yaw_towards(self.position, player.position, self.yaw);
            self.set_state(AgentState::Chasing);
            return AgentIntent::Hold;
        }

        if horizontal_distance(self.position, self.patrol_target) <= config.arrival_distance {
            self.patrol_target = self.random_patrol_target(ctx, rng);
        }

        let velocity = arrive(self.position, self.patrol_target, config.patrol_speed, ctx.delta_time);
        self.walk(velocity)
    }

    fn tick_chase(&mut self, ctx: &AgentContext<'_>) -> AgentIntent {
        let config = ctx.config;
        let Some(player) = self.live_target(ctx.players) else {
            self.lose_target();
            return AgentIntent::Hold;
        };

        let distance = horizontal_distance(self.position, player.position);
        if distance > config.chase_radius * 1.5 {
            self.lose_target();
            return AgentIntent::Hold;
        }

        self.yaw = yaw_towards(self.position, player.position, self.yaw);
        if distance <= config.attack_range {
            self.set_state(AgentState::Attacking);
            return AgentIntent::Hold;
        }

        self.walk(seek(self.position, player.position, config.chase_speed))
    }

    fn tick_attack<R: Rng + ?Sized>(&mut self, ctx: &AgentContext<'_>, rng: &mut R) -> AgentIntent {
        let config = ctx.config;
        let Some(player) = self.live_target(ctx.players) else {
            self.lose_target();
            return AgentIntent::Hold;
        };

        let distance = horizontal_distance(self.position, player.position);
        if distance > config.attack_range * 1.2 {
            self.set_state(AgentState::Chasing);
            return AgentIntent::Hold;
        }

        self.yaw = yaw_towards(self.position, player.position, self.yaw);

        let ready = self
            .last_attack_time
            .map_or(true, |last| ctx.now - last >= config.attack_cooldown);
        if !ready {
            return AgentIntent::Hold;
        }
        self.last_attack_time = Some(ctx.now);

        let chance = hit_chance(distance, config.attack_range);
        if rng.random_bool(f64::from(chance)) {
            AgentIntent::Strike {
                target: player.id,
                damage: config.attack_damage,
            }
        } else {
            AgentIntent::Hold
        }
    }

    fn tick_dead<R: Rng + ?Sized>(&mut self, ctx: &AgentContext<'_>, rng: &mut R) -> AgentIntent {
        let config = ctx.config;
        if !config.respawn_enabled {
            return AgentIntent::Hold;
        }
        match self.death_time {
            Some(died) if ctx.now - died > config.respawn_delay => {
                self.respawn(ctx, rng);
                AgentIntent::Respawned
            }
            _ => AgentIntent::Hold,
        }
    }

    fn respawn<R: Rng + ?Sized>(&mut self, ctx: &AgentContext<'_>, rng: &mut R) {
        let config = ctx.config;
        let offset = random_disc_point(config.respawn_scatter, rng);
        let x = self.spawn_point.x + offset.x;
        let z = self.spawn_point.z + offset.y;

        self.position = Vec3::new(x, ctx.terrain.sample(x, z) + config.ground_offset, z);
        self.patrol_target = self.position;
        self.health.reset();
        self.target = None;
        self.is_alive = true;
        self.death_time = None;
        self.last_attack_time = None;
        self.set_state(AgentState::Respawning);
    }

    /// Apply incoming damage.
    ///
    /// Dead agents ignore damage. A surviving agent without a target adopts
    /// the attacker and starts chasing; a lethal hit moves it to `Dead`.
    pub fn apply_damage(&mut self, amount: f32, attacker: Option<PlayerId>, now: f64) -> DamageOutcome {
        if !self.is_alive || self.state == AgentState::Dead {
            return DamageOutcome::default();
        }

        let (dealt, lethal) = self.health.apply_damage(amount);
        let mut outcome = DamageOutcome {
            dealt,
            lethal,
            aggro: false,
        };

        if lethal {
            self.die(now);
        } else if self.target.is_none() {
            if let Some(attacker) = attacker {
                self.target = Some(attacker);
                self.set_state(AgentState::Chasing);
                outcome.aggro = true;
            }
        }
        outcome
    }

    fn die(&mut self, now: f64) {
        self.health.set(0.0);
        self.is_alive = false;
        self.target = None;
        self.death_time = Some(now);
        self.set_state(AgentState::Dead);
    }

    fn walk(&mut self, velocity: Vec3) -> AgentIntent {
        if velocity.length_squared() < 1e-10 {
            return AgentIntent::Hold;
        }
        self.yaw = yaw_towards(Vec3::ZERO, velocity, self.yaw);
        AgentIntent::Move { velocity }
    }

    fn lose_target(&mut self) {
        self.target = None;
        self.set_state(AgentState::Patrolling);
    }

    fn live_target<'p>(&self, players: &'p [PlayerInfo]) -> Option<&'p PlayerInfo> {
        self.target
            .and_then(|id| find_player(players, id))
            .filter(|p| p.is_alive)
    }

    fn random_patrol_target<R: Rng + ?Sized>(&self, ctx: &AgentContext<'_>, rng: &mut R) -> Vec3 {
        let offset = random_disc_point(ctx.config.patrol_radius, rng);
        let x = self.spawn_point.x + offset.x;
        let z = self.spawn_point.z + offset.y;
        Vec3::new(x, ctx.terrain.sample(x, z) + ctx.config.ground_offset, z)
    }

    fn set_state(&mut self, next: AgentState) {
        if self.state == next {
            return;
        }
        debug_assert!(
            self.state.can_transition_to(next),
            "{}: {} -> {}",
            self.id,
            self.state,
            next
        );
        log::trace!("{}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    /// Check the data-model invariants. Returns the first violation.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if !self.position.is_finite() || !self.spawn_point.is_finite() || !self.patrol_target.is_finite() {
            return Err("non-finite position");
        }
        if !self.yaw.is_finite() || !self.health.current.is_finite() || !self.health.max.is_finite() {
            return Err("non-finite value");
        }
        if self.health.current < 0.0 || self.health.current > self.health.max {
            return Err("health out of range");
        }
        if (self.health.current <= 0.0) != (self.state == AgentState::Dead) {
            return Err("health is zero exactly when dead");
        }
        if self.is_alive == (self.state == AgentState::Dead) {
            return Err("is_alive disagrees with state");
        }
        if self.target.is_some() != self.state.has_target_slot() {
            return Err("target present exactly while chasing or attacking");
        }
        if self.state == AgentState::Dead && self.death_time.is_none() {
            return Err("dead without death time");
        }
        Ok(())
    }
}

/// Uniform point in a disc of `radius` (x, z offsets)
pub(crate) fn random_disc_point<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> glam::Vec2 {
    if !(radius > 0.0) {
        return glam::Vec2::ZERO;
    }
    let angle = rng.random_range(0.0..TAU);
    let r = radius * rng.random::<f32>().sqrt();
    glam::Vec2::new(angle.cos() * r, angle.sin() * r)
}
