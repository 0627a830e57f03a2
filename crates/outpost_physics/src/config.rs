//! Collision configuration

use serde::{Deserialize, Serialize};

/// Collision world configuration.
///
/// Angles are radians. Every threshold used by the resolver and the ground
/// queries lives here so it can be tuned from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of a spatial grid cell (world units)
    pub cell_size: f32,

    /// Maximum push-out iterations per `resolve_movement` call
    pub max_iterations: u32,

    /// Extra distance added when pushing a sphere out of an object
    pub push_epsilon: f32,

    /// Velocity multiplier applied after each collision response
    pub collision_damping: f32,

    /// Slopes steeper than this make bodies slide
    pub max_slope_angle: f32,

    /// Offset of the four heightfield samples used to estimate the normal
    pub slope_sample_offset: f32,

    /// Gap between sphere bottom and ground still counted as grounded
    pub ground_tolerance: f32,

    /// Highest standable top a body can step onto from its feet
    pub max_step_height: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            max_iterations: 5,
            push_epsilon: 0.001,
            collision_damping: 0.8,
            max_slope_angle: 45f32.to_radians(),
            slope_sample_offset: 0.5,
            ground_tolerance: 0.1,
            max_step_height: 0.5,
        }
    }
}

impl CollisionConfig {
    /// Set the grid cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the iteration bound for movement resolution
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the slope limit in radians
    pub fn with_max_slope_angle(mut self, radians: f32) -> Self {
        self.max_slope_angle = radians;
        self
    }

    /// Set the collision damping factor
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.collision_damping = damping;
        self
    }

    /// Check the configuration for values the resolver cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(crate::PhysicsError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.max_iterations == 0 {
            return Err(crate::PhysicsError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err(crate::PhysicsError::InvalidConfig(format!(
                "collision_damping must be within 0..=1, got {}",
                self.collision_damping
            )));
        }
        if !(self.slope_sample_offset > 0.0) {
            return Err(crate::PhysicsError::InvalidConfig(
                "slope_sample_offset must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CollisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cell() {
        let config = CollisionConfig::default().with_cell_size(0.0);
        assert!(config.validate().is_err());
    }
}
