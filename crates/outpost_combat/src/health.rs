//! Health pool

use serde::{Deserialize, Serialize};

/// Health pool clamped to `0..=max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
}

impl Health {
    /// Full health pool
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Apply damage.
    /// Returns the actual damage dealt and whether this depleted the pool.
    pub fn apply_damage(&mut self, amount: f32) -> (f32, bool) {
        if self.is_depleted() || !amount.is_finite() || amount <= 0.0 {
            return (0.0, false);
        }

        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        (before - self.current, self.current <= 0.0)
    }

    /// Heal. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_depleted() || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }

        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Set health directly (clamped to 0..max)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Back to full
    pub fn reset(&mut self) {
        self.current = self.max;
    }

    /// Nothing left
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Current / max (0 when max is 0)
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}
