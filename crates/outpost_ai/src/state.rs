//! Agent behavior states

use serde::{Deserialize, Serialize};

/// Behavior state of an enemy agent.
///
/// ```text
/// Spawning -> Patrolling <-> Chasing <-> Attacking
///                 any alive state -> Dead -> Respawning -> Spawning
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Just created; picks a patrol target on its first tick
    Spawning,
    /// Wandering between patrol targets
    Patrolling,
    /// Running toward a target player
    Chasing,
    /// In range of the target and rolling attacks
    Attacking,
    /// Health reached zero
    Dead,
    /// Reset after death, about to spawn again
    Respawning,
}

impl AgentState {
    /// States that may hold a target
    pub fn has_target_slot(self) -> bool {
        matches!(self, AgentState::Chasing | AgentState::Attacking)
    }

    /// Whether a transition from `self` to `next` is part of the state graph
    pub fn can_transition_to(self, next: AgentState) -> bool {
        use AgentState::*;
        match (self, next) {
            (Dead, Respawning) => true,
            (Dead, _) => false,
            (_, Dead) => true,
            (Spawning, Patrolling) => true,
            (Patrolling, Chasing) => true,
            (Chasing, Patrolling) | (Chasing, Attacking) => true,
            (Attacking, Chasing) | (Attacking, Patrolling) => true,
            (Respawning, Spawning) => true,
            // Damage makes an untargeted agent give chase right away
            (Spawning, Chasing) | (Respawning, Chasing) => true,
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AgentState::Spawning => "spawning",
            AgentState::Patrolling => "patrolling",
            AgentState::Chasing => "chasing",
            AgentState::Attacking => "attacking",
            AgentState::Dead => "dead",
            AgentState::Respawning => "respawning",
        }
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Spawning
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
