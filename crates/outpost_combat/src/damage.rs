//! Damage information

use glam::Vec3;
use outpost_core::PlayerId;
use serde::{Deserialize, Serialize};

/// Information about a damage instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Damage amount
    pub amount: f32,
    /// Player that caused the damage (if any)
    pub attacker: Option<PlayerId>,
    /// World position where the damage landed
    pub hit_point: Option<Vec3>,
    /// Distance along the shot
    pub distance: Option<f32>,
}

impl DamageInfo {
    /// Create new damage info
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            attacker: None,
            hit_point: None,
            distance: None,
        }
    }

    /// Set the attacker
    pub fn with_attacker(mut self, attacker: Option<PlayerId>) -> Self {
        self.attacker = attacker;
        self
    }

    /// Set the hit point and distance along the ray
    pub fn with_hit(mut self, point: Vec3, distance: f32) -> Self {
        self.hit_point = Some(point);
        self.distance = Some(distance);
        self
    }

    /// Finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0
    }
}

impl Default for DamageInfo {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_info() {
        let damage = DamageInfo::new(25.0)
            .with_attacker(Some(PlayerId(4)))
            .with_hit(Vec3::new(0.0, 0.0, -0.8), 9.2);

        assert_eq!(damage.amount, 25.0);
        assert_eq!(damage.attacker, Some(PlayerId(4)));
        assert_eq!(damage.distance, Some(9.2));
        assert!(damage.is_valid());
    }

    #[test]
    fn test_invalid_amounts() {
        assert!(!DamageInfo::new(0.0).is_valid());
        assert!(!DamageInfo::new(-3.0).is_valid());
        assert!(!DamageInfo::new(f32::NAN).is_valid());
    }
}
