//! Flat, schema-stable records of the director's live set
//!
//! Field names and enum tags are part of the replication contract; other
//! implementations decode these records by name.

use crate::agent::Agent;
use crate::error::{Result, SnapshotError};
use crate::loot::LootDrop;
use crate::state::AgentState;
use glam::Vec3;
use outpost_combat::Health;
use outpost_core::{AgentId, PlayerId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Decode an `Option` whose key must be present; only its value may be null.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// One agent, every field of the data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Vec3,
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub state: AgentState,
    #[serde(deserialize_with = "present")]
    pub target: Option<PlayerId>,
    pub spawn_point: Vec3,
    pub patrol_target: Vec3,
    #[serde(deserialize_with = "present")]
    pub last_attack_time: Option<f64>,
    pub last_update_time: f64,
    pub is_alive: bool,
    #[serde(deserialize_with = "present")]
    pub death_time: Option<f64>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            yaw: agent.yaw,
            health: agent.health.current,
            max_health: agent.health.max,
            state: agent.state,
            target: agent.target,
            spawn_point: agent.spawn_point,
            patrol_target: agent.patrol_target,
            last_attack_time: agent.last_attack_time,
            last_update_time: agent.last_update_time,
            is_alive: agent.is_alive,
            death_time: agent.death_time,
        }
    }
}

impl AgentSnapshot {
    /// Rebuild the agent, checking every invariant
    pub fn to_agent(&self) -> Result<Agent> {
        let invalid = |reason| SnapshotError::InvalidAgent { id: self.id, reason };

        let times_finite = self.last_update_time.is_finite()
            && self.last_attack_time.map_or(true, f64::is_finite)
            && self.death_time.map_or(true, f64::is_finite);
        if !times_finite {
            return Err(invalid("non-finite timestamp"));
        }
        if !(self.max_health > 0.0) {
            return Err(invalid("max health must be positive"));
        }

        let agent = Agent {
            id: self.id,
            position: self.position,
            yaw: self.yaw,
            health: Health {
                current: self.health,
                max: self.max_health,
            },
            state: self.state,
            target: self.target,
            spawn_point: self.spawn_point,
            patrol_target: self.patrol_target,
            last_attack_time: self.last_attack_time,
            last_update_time: self.last_update_time,
            is_alive: self.is_alive,
            death_time: self.death_time,
        };
        agent.check_invariants().map_err(invalid)?;
        Ok(agent)
    }
}

/// The director's whole live set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DirectorSnapshot {
    /// Simulation clock at export
    pub clock: f64,
    pub agents: Vec<AgentSnapshot>,
    pub loot_drops: Vec<LootDrop>,
}

impl DirectorSnapshot {
    /// Validate the whole batch and rebuild the agents.
    ///
    /// Returns the first problem found; nothing is partially accepted.
    pub fn validate(&self) -> Result<Vec<Agent>> {
        if !self.clock.is_finite() || self.clock < 0.0 {
            return Err(SnapshotError::InvalidClock(self.clock));
        }

        let mut seen = HashSet::with_capacity(self.agents.len());
        let mut agents = Vec::with_capacity(self.agents.len());
        for record in &self.agents {
            if !seen.insert(record.id) {
                return Err(SnapshotError::DuplicateAgent(record.id));
            }
            agents.push(record.to_agent()?);
        }

        let mut seen_loot = HashSet::with_capacity(self.loot_drops.len());
        for drop in &self.loot_drops {
            if !seen_loot.insert(drop.id) {
                return Err(SnapshotError::DuplicateLoot(drop.id));
            }
            if !drop.position.is_finite() {
                return Err(SnapshotError::InvalidLoot {
                    id: drop.id,
                    reason: "non-finite position",
                });
            }
            if !drop.spawn_time.is_finite() {
                return Err(SnapshotError::InvalidLoot {
                    id: drop.id,
                    reason: "non-finite spawn time",
                });
            }
        }

        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyConfig;
    use crate::loot::LootItem;
    use outpost_core::LootId;

    fn record(id: u64) -> AgentSnapshot {
        let agent = Agent::new(AgentId(id), Vec3::new(id as f32, 1.0, 0.0), &EnemyConfig::default(), 0.0);
        AgentSnapshot::from(&agent)
    }

    #[test]
    fn test_valid_snapshot() {
        let snapshot = DirectorSnapshot {
            clock: 3.0,
            agents: vec![record(1), record(2)],
            loot_drops: vec![LootDrop {
                id: LootId(1),
                position: Vec3::ZERO,
                items: vec![LootItem {
                    kind: "scrap".into(),
                    quantity: 1,
                }],
                spawn_time: 1.0,
            }],
        };
        assert_eq!(snapshot.validate().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_duplicates() {
        let snapshot = DirectorSnapshot {
            agents: vec![record(1), record(1)],
            ..Default::default()
        };
        assert_eq!(snapshot.validate().unwrap_err(), SnapshotError::DuplicateAgent(AgentId(1)));
    }

    #[test]
    fn test_rejects_zero_health_alive_agent() {
        let mut bad = record(1);
        bad.health = 0.0;
        let snapshot = DirectorSnapshot {
            agents: vec![record(2), bad],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::InvalidAgent { id: AgentId(1), .. })
        ));
    }

    #[test]
    fn test_rejects_target_while_patrolling() {
        let mut bad = record(1);
        bad.state = AgentState::Patrolling;
        bad.target = Some(PlayerId(1));
        let snapshot = DirectorSnapshot {
            agents: vec![bad],
            ..Default::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_rejects_chasing_without_target() {
        let mut bad = record(1);
        bad.state = AgentState::Chasing;
        let snapshot = DirectorSnapshot {
            agents: vec![bad],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::InvalidAgent { id: AgentId(1), .. })
        ));
    }

    #[test]
    fn test_unknown_state_tag_fails_decode() {
        let mut value = serde_json::to_value(DirectorSnapshot {
            agents: vec![record(1)],
            ..Default::default()
        })
        .unwrap();
        value["agents"][0]["state"] = serde_json::json!("berserk");
        assert!(serde_json::from_value::<DirectorSnapshot>(value).is_err());
    }

    #[test]
    fn test_missing_field_fails_decode() {
        let mut value = serde_json::to_value(record(1)).unwrap();
        value.as_object_mut().unwrap().remove("health");
        assert!(serde_json::from_value::<AgentSnapshot>(value).is_err());
    }

    #[test]
    fn test_missing_optional_keys_fail_decode() {
        for key in ["target", "last_attack_time", "death_time"] {
            let mut value = serde_json::to_value(record(1)).unwrap();
            assert!(value[key].is_null());
            value.as_object_mut().unwrap().remove(key);
            assert!(
                serde_json::from_value::<AgentSnapshot>(value).is_err(),
                "decoded without {}",
                key
            );
        }

        // Explicit nulls are still fine
        let value = serde_json::to_value(record(1)).unwrap();
        assert_eq!(serde_json::from_value::<AgentSnapshot>(value).unwrap(), record(1));
    }

    #[test]
    fn test_unknown_loot_field_fails_decode() {
        let mut value = serde_json::to_value(DirectorSnapshot {
            loot_drops: vec![LootDrop {
                id: LootId(1),
                position: Vec3::ZERO,
                items: Vec::new(),
                spawn_time: 0.0,
            }],
            ..Default::default()
        })
        .unwrap();
        value["loot_drops"][0]["rarity"] = serde_json::json!("epic");
        assert!(serde_json::from_value::<DirectorSnapshot>(value).is_err());
    }

    #[test]
    fn test_empty_loot_drop_is_valid() {
        let snapshot = DirectorSnapshot {
            loot_drops: vec![LootDrop {
                id: LootId(4),
                position: Vec3::ONE,
                items: Vec::new(),
                spawn_time: 2.0,
            }],
            ..Default::default()
        };
        assert!(snapshot.validate().is_ok());
    }
}
