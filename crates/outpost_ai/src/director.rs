//! Enemy director - owns the live agent set, the spawn economy and loot

use crate::agent::{Agent, AgentContext, AgentIntent};
use crate::config::{EnemyConfig, LootConfig, SpawnConfig};
use crate::error::{Result, SnapshotError};
use crate::events::{
    AttackEvent, DeathEvent, DespawnEvent, DespawnReason, DirectorEvent, DirectorEvents, LootPickupEvent,
    LootSpawnEvent, SpawnEvent,
};
use crate::loot::{roll_items, LootDrop};
use crate::snapshot::{AgentSnapshot, DirectorSnapshot};
use crate::steering::horizontal_distance;
use glam::Vec3;
use outpost_combat::{CombatTargets, DamageInfo, DamageResponse, TargetInfo};
use outpost_core::{AgentId, HeightField, IdGenerator, LootId, ObjectId, PlayerId, PlayerInfo};
use outpost_physics::{CollisionWorld, WorldObject};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::f32::consts::TAU;

/// Receives damage dealt to players by agent attacks
pub trait PlayerDamageSink {
    fn damage_player(&mut self, player: PlayerId, amount: f32, source: AgentId);
}

impl<F> PlayerDamageSink for F
where
    F: FnMut(PlayerId, f32, AgentId),
{
    fn damage_player(&mut self, player: PlayerId, amount: f32, source: AgentId) {
        self(player, amount, source)
    }
}

/// Collaborators for one director update
pub struct TickContext<'a> {
    /// Tick length, seconds
    pub delta_time: f32,
    /// Connected players this tick
    pub players: &'a [PlayerInfo],
    /// Ground sampler
    pub terrain: &'a dyn HeightField,
    /// Collision world holding agent bodies
    pub world: &'a mut CollisionWorld,
    /// Where agent attacks land
    pub player_damage: &'a mut dyn PlayerDamageSink,
}

/// What happened during one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Vec<AgentId>,
    pub respawned: Vec<AgentId>,
    pub despawned: Vec<AgentId>,
    pub expired_loot: Vec<LootId>,
    pub attacks: usize,
}

/// Owns every enemy agent and loot drop.
///
/// Agents are kept in id order so a seeded director replays identically.
/// Events raised while agents tick are queued and dispatched after the pass.
pub struct EnemyDirector {
    enemy: EnemyConfig,
    spawn: SpawnConfig,
    loot_config: LootConfig,

    agents: BTreeMap<AgentId, Agent>,
    loot: BTreeMap<LootId, LootDrop>,

    agent_ids: IdGenerator,
    loot_ids: IdGenerator,
    rng: ChaCha8Rng,

    /// Simulation clock, seconds
    clock: f64,
    last_spawn_check: Option<f64>,

    events: DirectorEvents,
    pending: Vec<DirectorEvent>,
    disposed: bool,
}

impl EnemyDirector {
    /// Create a director with a deterministic random stream
    pub fn new(enemy: EnemyConfig, spawn: SpawnConfig, loot: LootConfig, seed: u64) -> Self {
        Self {
            enemy,
            spawn,
            loot_config: loot,
            agents: BTreeMap::new(),
            loot: BTreeMap::new(),
            agent_ids: IdGenerator::new(),
            loot_ids: IdGenerator::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            last_spawn_check: None,
            events: DirectorEvents::default(),
            pending: Vec::new(),
            disposed: false,
        }
    }

    pub fn enemy_config(&self) -> &EnemyConfig {
        &self.enemy
    }

    pub fn spawn_config(&self) -> &SpawnConfig {
        &self.spawn
    }

    /// Subscriber lists
    pub fn events(&self) -> &DirectorEvents {
        &self.events
    }

    /// Subscriber lists, for subscribing
    pub fn events_mut(&mut self) -> &mut DirectorEvents {
        &mut self.events
    }

    /// Simulation clock, seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Every agent in id order, dead ones included
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Agents in the live set (dead ones awaiting respawn or cleanup included)
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Agents currently alive
    pub fn alive_count(&self) -> usize {
        self.agents.values().filter(|a| a.is_alive).count()
    }

    pub fn loot(&self, id: LootId) -> Option<&LootDrop> {
        self.loot.get(&id)
    }

    pub fn loot_drops(&self) -> impl Iterator<Item = &LootDrop> {
        self.loot.values()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Run one simulation tick.
    ///
    /// Order: offload check, agent pass, event dispatch, loot and corpse
    /// cleanup, then the time-gated spawn check.
    pub fn update(&mut self, ctx: TickContext<'_>) -> TickReport {
        let mut report = TickReport::default();
        if self.disposed {
            return report;
        }

        let TickContext {
            delta_time,
            players,
            terrain,
            world,
            player_damage,
        } = ctx;

        let dt = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            log::warn!("Ignoring invalid delta time {}", delta_time);
            0.0
        };
        self.clock += f64::from(dt);

        if self.spawn.auto_populate && players.len() >= self.spawn.spawn_threshold {
            if !self.agents.is_empty() {
                log::info!(
                    "{} players connected, offloading {} agents",
                    players.len(),
                    self.agents.len()
                );
                report.despawned = self.despawn_all(world, DespawnReason::Offload);
            }
        } else {
            self.tick_agents(dt, players, terrain, world, player_damage, &mut report);
        }
        self.flush_events();

        self.cleanup(world, &mut report);
        self.spawn_check(players, terrain, world, &mut report);
        self.flush_events();

        report
    }

    fn tick_agents(
        &mut self,
        dt: f32,
        players: &[PlayerInfo],
        terrain: &dyn HeightField,
        world: &mut CollisionWorld,
        player_damage: &mut dyn PlayerDamageSink,
        report: &mut TickReport,
    ) {
        let ctx = AgentContext {
            now: self.clock,
            delta_time: dt,
            players,
            terrain,
            config: &self.enemy,
        };

        for agent in self.agents.values_mut() {
            match agent.tick(&ctx, &mut self.rng) {
                AgentIntent::Hold => {}
                AgentIntent::Move { velocity } => {
                    let body = ObjectId::Agent(agent.id);
                    let proposed = agent.position + velocity * dt;
                    let moved = world.resolve_movement(proposed, self.enemy.body_radius, velocity, &[body]);
                    let (x, z) = (moved.position.x, moved.position.z);
                    agent.position = Vec3::new(x, terrain.sample(x, z) + self.enemy.ground_offset, z);
                    world.update_object_position(body, agent.position);
                }
                AgentIntent::Strike { target, damage } => {
                    player_damage.damage_player(target, damage, agent.id);
                    report.attacks += 1;
                    self.pending.push(DirectorEvent::Attack(AttackEvent {
                        agent_id: agent.id,
                        target,
                        damage,
                    }));
                }
                AgentIntent::Respawned => {
                    place_body(world, agent, self.enemy.body_radius);
                    report.respawned.push(agent.id);
                    self.pending
                        .push(DirectorEvent::Spawn(SpawnEvent { agent: agent.clone() }));
                }
            }
        }
    }

    fn cleanup(&mut self, world: &mut CollisionWorld, report: &mut TickReport) {
        let now = self.clock;

        let lifetime = self.loot_config.loot_lifetime;
        let expired: Vec<LootId> = self
            .loot
            .values()
            .filter(|drop| drop.is_expired(now, lifetime))
            .map(|drop| drop.id)
            .collect();
        for id in expired {
            self.loot.remove(&id);
            world.remove_object(ObjectId::Loot(id));
            log::debug!("{} expired", id);
            report.expired_loot.push(id);
        }

        if self.enemy.respawn_enabled {
            return;
        }
        let corpse_lifetime = self.enemy.corpse_lifetime;
        let corpses: Vec<AgentId> = self
            .agents
            .values()
            .filter(|a| !a.is_alive && a.death_time.is_some_and(|t| now - t > corpse_lifetime))
            .map(|a| a.id)
            .collect();
        for id in corpses {
            self.agents.remove(&id);
            world.remove_object(ObjectId::Agent(id));
            report.despawned.push(id);
            self.pending.push(DirectorEvent::Despawn(DespawnEvent {
                agent_id: id,
                reason: DespawnReason::CorpseExpired,
            }));
        }
    }

    fn spawn_check(
        &mut self,
        players: &[PlayerInfo],
        terrain: &dyn HeightField,
        world: &mut CollisionWorld,
        report: &mut TickReport,
    ) {
        let spawn = &self.spawn;
        if !spawn.auto_populate || players.is_empty() || players.len() >= spawn.spawn_threshold {
            return;
        }

        let due = self
            .last_spawn_check
            .map_or(true, |last| self.clock - last >= spawn.spawn_check_interval);
        if !due {
            return;
        }
        self.last_spawn_check = Some(self.clock);

        let target = spawn.target_population(players.len());
        let population = self.agents.len();
        if population >= target {
            return;
        }

        let count = (target - population).min(spawn.max_spawn_batch);
        let spawned = self.spawn_batch(count, players, terrain, world);
        report.spawned.extend(spawned);
    }

    /// Try to spawn `count` agents around random live players.
    ///
    /// Each spawn whose position search is exhausted is skipped. Returns the
    /// ids actually created.
    pub fn spawn_batch(
        &mut self,
        count: usize,
        players: &[PlayerInfo],
        terrain: &dyn HeightField,
        world: &mut CollisionWorld,
    ) -> Vec<AgentId> {
        let mut spawned = Vec::with_capacity(count);
        if self.disposed {
            return spawned;
        }

        for _ in 0..count {
            match self.find_spawn_position(players, terrain) {
                Some(position) => spawned.extend(self.insert_agent(position, world)),
                None => log::debug!(
                    "No spawn position found after {} attempts, skipping",
                    self.spawn.spawn_attempts
                ),
            }
        }
        self.flush_events();
        spawned
    }

    /// Search the spawn annulus around a random live player.
    ///
    /// A candidate is accepted when it keeps `min_spawn_separation` from
    /// every player and every live agent.
    pub fn find_spawn_position(&mut self, players: &[PlayerInfo], terrain: &dyn HeightField) -> Option<Vec3> {
        let live: Vec<&PlayerInfo> = players.iter().filter(|p| p.is_alive).collect();
        if live.is_empty() {
            return None;
        }
        let anchor = live[self.rng.random_range(0..live.len())].position;

        let spawn = &self.spawn;
        let lo = spawn.spawn_min_radius.min(spawn.spawn_max_radius).max(0.0);
        let hi = spawn.spawn_min_radius.max(spawn.spawn_max_radius).max(0.0);

        for _ in 0..spawn.spawn_attempts {
            let angle = self.rng.random_range(0.0..TAU);
            let radius = if hi > lo { self.rng.random_range(lo..hi) } else { lo };
            let x = anchor.x + angle.cos() * radius;
            let z = anchor.z + angle.sin() * radius;
            let candidate = Vec3::new(x, terrain.sample(x, z) + self.enemy.ground_offset, z);

            let separation = spawn.min_spawn_separation;
            let clear_of_players = players
                .iter()
                .all(|p| horizontal_distance(p.position, candidate) >= separation);
            let clear_of_agents = self
                .agents
                .values()
                .filter(|a| a.is_alive)
                .all(|a| horizontal_distance(a.position, candidate) >= separation);

            if clear_of_players && clear_of_agents {
                return Some(candidate);
            }
        }
        None
    }

    /// Place a new agent directly at `position`
    pub fn spawn_agent_at(&mut self, position: Vec3, world: &mut CollisionWorld) -> Option<AgentId> {
        if self.disposed {
            return None;
        }
        let id = self.insert_agent(position, world);
        self.flush_events();
        id
    }

    fn insert_agent(&mut self, position: Vec3, world: &mut CollisionWorld) -> Option<AgentId> {
        if !position.is_finite() {
            log::warn!("Refusing to spawn an agent at {:?}", position);
            return None;
        }

        let id = AgentId(self.agent_ids.next_raw());
        if self.agents.contains_key(&id) {
            log::warn!("{} is already live, skipping spawn", id);
            return None;
        }
        if let Err(err) = world.insert_object(WorldObject::agent(ObjectId::Agent(id), position, self.enemy.body_radius)) {
            log::warn!("Could not place body for {}: {}", id, err);
            return None;
        }

        let agent = Agent::new(id, position, &self.enemy, self.clock);
        log::debug!("Spawned {} at {:?}", id, position);
        self.pending
            .push(DirectorEvent::Spawn(SpawnEvent { agent: agent.clone() }));
        self.agents.insert(id, agent);
        Some(id)
    }

    /// Hit spheres of every live agent
    pub fn live_targets(&self) -> Vec<TargetInfo> {
        self.agents
            .values()
            .filter(|a| a.is_alive)
            .map(|a| TargetInfo {
                id: a.id,
                position: a.position,
                hit_radius: self.enemy.hit_radius,
            })
            .collect()
    }

    /// Apply damage to an agent. Returns whether it was lethal.
    ///
    /// Unknown or already dead agents and invalid amounts are logged and
    /// ignored. A lethal hit removes the body from the collision world, rolls
    /// loot and emits the death (and loot spawn) events.
    pub fn apply_damage(&mut self, agent_id: AgentId, damage: &DamageInfo, world: &mut CollisionWorld) -> bool {
        self.damage_agent(agent_id, damage, world).is_lethal()
    }

    /// [`apply_damage`](Self::apply_damage), telling refused damage apart
    /// from a non-lethal hit
    pub fn damage_agent(&mut self, agent_id: AgentId, damage: &DamageInfo, world: &mut CollisionWorld) -> DamageResponse {
        if self.disposed {
            return DamageResponse::Rejected;
        }
        if !damage.is_valid() {
            log::warn!("Ignoring invalid damage {} to {}", damage.amount, agent_id);
            return DamageResponse::Rejected;
        }

        let now = self.clock;
        let Some(agent) = self.agents.get_mut(&agent_id) else {
            log::warn!("Damage to unknown {}", agent_id);
            return DamageResponse::Rejected;
        };
        if !agent.is_alive {
            log::warn!("Damage to dead {}", agent_id);
            return DamageResponse::Rejected;
        }

        let outcome = agent.apply_damage(damage.amount, damage.attacker, now);
        if !outcome.lethal {
            return DamageResponse::Wounded;
        }

        let agent = agent.clone();
        world.remove_object(ObjectId::Agent(agent_id));
        let loot = self.drop_loot(agent.position, world);
        log::debug!("{} killed by {:?}", agent_id, damage.attacker);

        self.pending.push(DirectorEvent::Death(DeathEvent {
            agent,
            loot: loot.clone(),
            killer: damage.attacker,
        }));
        self.pending
            .push(DirectorEvent::LootSpawn(LootSpawnEvent { loot }));
        self.flush_events();
        DamageResponse::Killed
    }

    /// Every death leaves a drop, even when the roll came up empty
    fn drop_loot(&mut self, position: Vec3, world: &mut CollisionWorld) -> LootDrop {
        let items = roll_items(&self.loot_config.table, &mut self.rng);
        let drop = LootDrop {
            id: LootId(self.loot_ids.next_raw()),
            position,
            items,
            spawn_time: self.clock,
        };
        place_pickup(world, &drop, self.loot_config.pickup_radius);
        self.loot.insert(drop.id, drop.clone());
        drop
    }

    /// Combat view over the live agents, applying damage through this director
    pub fn targets<'a>(&'a mut self, world: &'a mut CollisionWorld) -> DirectorTargets<'a> {
        DirectorTargets { director: self, world }
    }

    /// Hand a drop to a player
    pub fn pickup_loot(&mut self, loot_id: LootId, player_id: PlayerId, world: &mut CollisionWorld) -> Option<LootDrop> {
        if self.disposed {
            return None;
        }
        let Some(drop) = self.loot.remove(&loot_id) else {
            log::debug!("{} tried to pick up missing {}", player_id, loot_id);
            return None;
        };
        world.remove_object(ObjectId::Loot(loot_id));
        self.pending
            .push(DirectorEvent::LootPickup(LootPickupEvent { loot_id, player_id }));
        self.flush_events();
        Some(drop)
    }

    /// Drops whose pickup volume may reach within `radius` of `position`
    pub fn loot_near(&self, position: Vec3, radius: f32, world: &CollisionWorld) -> Vec<LootId> {
        world
            .index()
            .query_radius(position, radius)
            .into_iter()
            .filter_map(|id| match id {
                ObjectId::Loot(loot) if self.loot.contains_key(&loot) => Some(loot),
                _ => None,
            })
            .collect()
    }

    /// Remove every agent from the live set and the collision world
    pub fn despawn_all(&mut self, world: &mut CollisionWorld, reason: DespawnReason) -> Vec<AgentId> {
        let ids: Vec<AgentId> = self.agents.keys().copied().collect();
        for id in &ids {
            world.remove_object(ObjectId::Agent(*id));
            self.pending.push(DirectorEvent::Despawn(DespawnEvent {
                agent_id: *id,
                reason,
            }));
        }
        self.agents.clear();
        ids
    }

    /// Flat copy of the live set
    pub fn export_state(&self) -> DirectorSnapshot {
        DirectorSnapshot {
            clock: self.clock,
            agents: self.agents.values().map(AgentSnapshot::from).collect(),
            loot_drops: self.loot.values().cloned().collect(),
        }
    }

    /// Replace the live set with a snapshot.
    ///
    /// The whole snapshot is validated first; on error nothing changes.
    /// Bodies and pickups are re-registered in the collision world and id
    /// generators move past every imported id. No events are emitted.
    pub fn import_state(&mut self, snapshot: &DirectorSnapshot, world: &mut CollisionWorld) -> Result<()> {
        if self.disposed {
            return Err(SnapshotError::Disposed);
        }
        let agents = snapshot.validate()?;

        for id in self.agents.keys() {
            world.remove_object(ObjectId::Agent(*id));
        }
        for id in self.loot.keys() {
            world.remove_object(ObjectId::Loot(*id));
        }
        self.agents.clear();
        self.loot.clear();
        self.pending.clear();
        // The imported clock may be behind the old one
        self.last_spawn_check = None;

        for agent in agents {
            self.agent_ids.advance_past(agent.id.raw());
            if agent.is_alive {
                place_body(world, &agent, self.enemy.body_radius);
            } else {
                world.remove_object(ObjectId::Agent(agent.id));
            }
            self.agents.insert(agent.id, agent);
        }
        for drop in &snapshot.loot_drops {
            self.loot_ids.advance_past(drop.id.raw());
            place_pickup(world, drop, self.loot_config.pickup_radius);
            self.loot.insert(drop.id, drop.clone());
        }
        self.clock = snapshot.clock;

        log::debug!(
            "Imported {} agents and {} loot drops",
            self.agents.len(),
            self.loot.len()
        );
        Ok(())
    }

    /// Drop every agent, loot drop and subscriber. Safe to call repeatedly.
    pub fn dispose(&mut self, world: &mut CollisionWorld) {
        if self.disposed {
            return;
        }
        for id in self.agents.keys() {
            world.remove_object(ObjectId::Agent(*id));
        }
        for id in self.loot.keys() {
            world.remove_object(ObjectId::Loot(*id));
        }
        self.agents.clear();
        self.loot.clear();
        self.pending.clear();
        self.events.clear();
        self.last_spawn_check = None;
        self.disposed = true;
        log::info!("Enemy director disposed");
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut pending = std::mem::take(&mut self.pending);
        for event in &pending {
            self.events.dispatch(event);
        }
        pending.clear();
        self.pending = pending;
    }
}

impl std::fmt::Debug for EnemyDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnemyDirector")
            .field("agents", &self.agents.len())
            .field("loot", &self.loot.len())
            .field("clock", &self.clock)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Register or move an agent body
fn place_body(world: &mut CollisionWorld, agent: &Agent, radius: f32) {
    let id = ObjectId::Agent(agent.id);
    if world.contains(id) {
        world.update_object_position(id, agent.position);
    } else if let Err(err) = world.insert_object(WorldObject::agent(id, agent.position, radius)) {
        log::warn!("Could not place body for {}: {}", agent.id, err);
    }
}

fn place_pickup(world: &mut CollisionWorld, drop: &LootDrop, radius: f32) {
    let id = ObjectId::Loot(drop.id);
    world.remove_object(id);
    if let Err(err) = world.insert_object(WorldObject::pickup(id, drop.position, radius)) {
        log::warn!("Could not place pickup for {}: {}", drop.id, err);
    }
}

/// [`CombatTargets`] over a director's live agents
pub struct DirectorTargets<'a> {
    director: &'a mut EnemyDirector,
    world: &'a mut CollisionWorld,
}

impl CombatTargets for DirectorTargets<'_> {
    fn live_targets(&self) -> Vec<TargetInfo> {
        self.director.live_targets()
    }

    fn request_damage(&mut self, target: AgentId, damage: &DamageInfo) -> DamageResponse {
        self.director.damage_agent(target, damage, self.world)
    }
}
