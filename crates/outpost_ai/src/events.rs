//! Director events
//!
//! Each kind has its own subscriber list. [`DirectorEvents::all`] receives
//! every event wrapped in [`DirectorEvent`], which is what gets forwarded to
//! an [`EventChannel`](outpost_event::EventChannel) for draining elsewhere.

use crate::agent::Agent;
use crate::loot::LootDrop;
use outpost_core::{AgentId, LootId, PlayerId};
use outpost_event::Observers;

/// An agent appeared (new spawn or respawn)
#[derive(Debug, Clone)]
pub struct SpawnEvent {
    pub agent: Agent,
}

/// An agent died
#[derive(Debug, Clone)]
pub struct DeathEvent {
    pub agent: Agent,
    /// Drop created with this death; `items` may be empty
    pub loot: LootDrop,
    pub killer: Option<PlayerId>,
}

/// An agent's attack roll succeeded
#[derive(Debug, Clone)]
pub struct AttackEvent {
    pub agent_id: AgentId,
    pub target: PlayerId,
    pub damage: f32,
}

/// A loot drop was placed in the world
#[derive(Debug, Clone)]
pub struct LootSpawnEvent {
    pub loot: LootDrop,
}

/// A player picked up a drop
#[derive(Debug, Clone)]
pub struct LootPickupEvent {
    pub loot_id: LootId,
    pub player_id: PlayerId,
}

/// Why an agent left the live set without dying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    /// Enough humans connected; AI population offloaded
    Offload,
    /// Corpse outlived its cleanup window
    CorpseExpired,
}

/// An agent was removed from the live set
#[derive(Debug, Clone)]
pub struct DespawnEvent {
    pub agent_id: AgentId,
    pub reason: DespawnReason,
}

/// Any director event
#[derive(Debug, Clone)]
pub enum DirectorEvent {
    Spawn(SpawnEvent),
    Death(DeathEvent),
    Attack(AttackEvent),
    LootSpawn(LootSpawnEvent),
    LootPickup(LootPickupEvent),
    Despawn(DespawnEvent),
}

/// Subscriber lists for every director event kind
#[derive(Debug, Default)]
pub struct DirectorEvents {
    pub spawn: Observers<SpawnEvent>,
    pub death: Observers<DeathEvent>,
    pub attack: Observers<AttackEvent>,
    pub loot_spawn: Observers<LootSpawnEvent>,
    pub loot_pickup: Observers<LootPickupEvent>,
    pub despawn: Observers<DespawnEvent>,
    pub all: Observers<DirectorEvent>,
}

impl DirectorEvents {
    /// Deliver an event to its kind's subscribers, then to `all`
    pub fn dispatch(&self, event: &DirectorEvent) {
        match event {
            DirectorEvent::Spawn(e) => self.spawn.emit(e),
            DirectorEvent::Death(e) => self.death.emit(e),
            DirectorEvent::Attack(e) => self.attack.emit(e),
            DirectorEvent::LootSpawn(e) => self.loot_spawn.emit(e),
            DirectorEvent::LootPickup(e) => self.loot_pickup.emit(e),
            DirectorEvent::Despawn(e) => self.despawn.emit(e),
        }
        self.all.emit(event);
    }

    /// Drop every subscriber
    pub fn clear(&mut self) {
        self.spawn.clear();
        self.death.clear();
        self.attack.clear();
        self.loot_spawn.clear();
        self.loot_pickup.clear();
        self.despawn.clear();
        self.all.clear();
    }

    /// Total subscribers across all kinds
    pub fn subscriber_count(&self) -> usize {
        self.spawn.len()
            + self.death.len()
            + self.attack.len()
            + self.loot_spawn.len()
            + self.loot_pickup.len()
            + self.despawn.len()
            + self.all.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_dispatch_reaches_kind_and_all() {
        let mut events = DirectorEvents::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        events.attack.subscribe(move |e: &AttackEvent| s.lock().push(format!("attack {}", e.damage)));
        let s = Arc::clone(&seen);
        events.all.subscribe(move |e: &DirectorEvent| {
            if let DirectorEvent::Attack(_) = e {
                s.lock().push("all".to_string());
            }
        });

        events.dispatch(&DirectorEvent::Attack(AttackEvent {
            agent_id: AgentId(1),
            target: PlayerId(2),
            damage: 10.0,
        }));

        assert_eq!(*seen.lock(), vec!["attack 10".to_string(), "all".to_string()]);
        assert_eq!(events.subscriber_count(), 2);

        events.clear();
        assert_eq!(events.subscriber_count(), 0);
    }
}
