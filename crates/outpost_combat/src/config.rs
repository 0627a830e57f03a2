//! Combat configuration

use serde::{Deserialize, Serialize};

/// Spread tuning shared by every weapon. Angles are radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Cone half-angle at accuracy 0.0
    pub max_spread_angle: f32,
    /// Extra cone half-angle applied to each scatter pellet
    pub pellet_spread: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_spread_angle: 0.1,
            pellet_spread: 0.08,
        }
    }
}

impl CombatConfig {
    /// Set the accuracy spread limit
    pub fn with_max_spread_angle(mut self, radians: f32) -> Self {
        self.max_spread_angle = radians;
        self
    }

    /// Set the per-pellet spread
    pub fn with_pellet_spread(mut self, radians: f32) -> Self {
        self.pellet_spread = radians;
        self
    }

    /// Spread cone half-angle for an accuracy value
    pub fn spread_for(&self, accuracy: f32) -> f32 {
        (1.0 - accuracy.clamp(0.0, 1.0)) * self.max_spread_angle.max(0.0)
    }
}
