//! Scripted headless session
//!
//! Players walk in slow circles, shoot at the nearest live agent and collect
//! whatever drops under their feet. At the end the enemy state is sent over
//! the authority bridge to a fresh replica and compared.

use crate::config::SimConfig;
use crate::game::Simulation;
use glam::Vec3;
use outpost_ai::{DirectorEvent, EnemyDirector};
use outpost_core::PlayerId;
use outpost_physics::CollisionWorld;
use outpost_sync::{AuthorityBridge, Result as SyncResult};
use std::f32::consts::TAU;
use std::fmt;

/// Ticks between shots for each scripted player
const FIRE_INTERVAL: u32 = 10;

/// Counts gathered over a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub ticks: u32,
    pub spawns: usize,
    pub deaths: usize,
    pub attacks: usize,
    pub loot_spawned: usize,
    pub loot_collected: usize,
    pub despawns: usize,
    pub shots: usize,
    pub waves_cleared: u32,
    pub players_downed: usize,
    pub final_population: usize,
    /// Size of the final replicated enemy state
    pub snapshot_bytes: usize,
    /// The replica matched the authority after the final sync
    pub replica_matches: bool,
}

impl SessionSummary {
    fn tally(&mut self, event: &DirectorEvent) {
        match event {
            DirectorEvent::Spawn(_) => self.spawns += 1,
            DirectorEvent::Death(_) => self.deaths += 1,
            DirectorEvent::Attack(_) => self.attacks += 1,
            DirectorEvent::LootSpawn(_) => self.loot_spawned += 1,
            DirectorEvent::LootPickup(_) => self.loot_collected += 1,
            DirectorEvent::Despawn(_) => self.despawns += 1,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session summary ({} ticks)", self.ticks)?;
        writeln!(f, "  spawns:          {}", self.spawns)?;
        writeln!(f, "  deaths:          {}", self.deaths)?;
        writeln!(f, "  agent attacks:   {}", self.attacks)?;
        writeln!(f, "  shots fired:     {}", self.shots)?;
        writeln!(f, "  loot spawned:    {}", self.loot_spawned)?;
        writeln!(f, "  loot collected:  {}", self.loot_collected)?;
        writeln!(f, "  despawns:        {}", self.despawns)?;
        writeln!(f, "  waves cleared:   {}", self.waves_cleared)?;
        writeln!(f, "  players downed:  {}", self.players_downed)?;
        writeln!(f, "  final population {}", self.final_population)?;
        write!(
            f,
            "  replication:     {} bytes, replica {}",
            self.snapshot_bytes,
            if self.replica_matches { "matches" } else { "DIVERGED" }
        )
    }
}

/// Run a scripted session to completion
pub fn run_session(config: &SimConfig) -> SyncResult<SessionSummary> {
    let session = config.session.clone();
    let dt = session.delta_time();
    let mut sim = Simulation::new(config.clone(), session.seed);
    let mut summary = SessionSummary::default();

    let ids: Vec<PlayerId> = (1..=session.players as u64).map(PlayerId).collect();
    for (i, id) in ids.iter().enumerate() {
        sim.add_player(*id, Vec3::new(i as f32 * 8.0, 0.0, 0.0));
    }

    for tick in 0..session.ticks {
        for (i, id) in ids.iter().enumerate() {
            let angle = (tick as f32 * dt * 0.2 + i as f32) % TAU;
            sim.move_player(*id, Vec3::new(angle.cos(), 0.0, angle.sin()), dt);

            if tick % FIRE_INTERVAL == 0 {
                if let Some(direction) = aim_at_nearest(&sim, *id) {
                    if sim.fire(*id, direction).is_some() {
                        summary.shots += 1;
                    }
                }
            }
            sim.collect_loot(*id);
        }

        let report = sim.update(dt);
        summary.players_downed += report.players_downed.len();
        if let Some(wave) = report.wave {
            if wave.cleared.is_some() {
                summary.waves_cleared += 1;
            }
        }

        for event in sim.drain_events() {
            summary.tally(&event);
        }
    }

    summary.ticks = session.ticks;
    summary.final_population = sim.director().population();

    let mut sender = AuthorityBridge::new(session.wire_format);
    let bytes = sender.export_enemy_state(sim.director())?;
    summary.snapshot_bytes = bytes.len();

    let mut replica_world = CollisionWorld::new(config.collision.clone());
    let mut replica = EnemyDirector::new(
        config.enemy.clone(),
        config.spawn.clone(),
        config.loot.clone(),
        session.seed,
    );
    let mut receiver = AuthorityBridge::new(session.wire_format);
    receiver.apply(&bytes, &mut replica, &mut replica_world)?;
    summary.replica_matches = replica.export_state() == sim.export_state();

    sim.dispose();
    Ok(summary)
}

fn aim_at_nearest(sim: &Simulation, id: PlayerId) -> Option<Vec3> {
    let player = sim.player(id)?;
    let eye = player.info.position + Vec3::Y * sim.config().player.ground_offset;

    sim.director()
        .live_targets()
        .into_iter()
        .map(|target| target.position - eye)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
}
