//! Weapon statistics

use serde::{Deserialize, Serialize};

/// How a weapon discharges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Single instant ray
    #[default]
    Hitscan,
    /// Several rays per shot (shotguns)
    Scatter,
}

/// Weapon statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Damage per shot (split across pellets for scatter weapons)
    pub damage: f32,
    /// Range in world units
    pub range: f32,
    /// 1.0 fires exactly along the aim direction
    pub accuracy: f32,
    /// Rays per shot for scatter weapons
    pub pellets: u32,
    /// Discharge kind
    pub kind: WeaponKind,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            damage: 25.0,
            range: 100.0,
            accuracy: 0.95,
            pellets: 1,
            kind: WeaponKind::Hitscan,
        }
    }
}

impl WeaponStats {
    /// Rifle-like hitscan weapon
    pub fn hitscan(damage: f32, range: f32) -> Self {
        Self {
            damage,
            range,
            ..Self::default()
        }
    }

    /// Shotgun-like scatter weapon
    pub fn scatter(damage: f32, range: f32, pellets: u32) -> Self {
        Self {
            damage,
            range,
            accuracy: 0.85,
            pellets,
            kind: WeaponKind::Scatter,
        }
    }

    /// Set accuracy (clamped to 0..=1)
    pub fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self
    }

    /// Number of rays per discharge
    pub fn projectile_count(&self) -> u32 {
        match self.kind {
            WeaponKind::Hitscan => 1,
            WeaponKind::Scatter => self.pellets.max(1),
        }
    }

    /// Damage dealt by each ray
    pub fn damage_per_projectile(&self) -> f32 {
        self.damage / self.projectile_count() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_count() {
        let rifle = WeaponStats::hitscan(25.0, 100.0);
        assert_eq!(rifle.projectile_count(), 1);
        assert_eq!(rifle.damage_per_projectile(), 25.0);

        let shotgun = WeaponStats::scatter(80.0, 30.0, 8);
        assert_eq!(shotgun.projectile_count(), 8);
        assert_eq!(shotgun.damage_per_projectile(), 10.0);

        let broken = WeaponStats {
            pellets: 0,
            ..shotgun
        };
        assert_eq!(broken.projectile_count(), 1);
    }

    #[test]
    fn test_accuracy_clamped() {
        assert_eq!(WeaponStats::default().with_accuracy(3.0).accuracy, 1.0);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(serde_json::to_string(&WeaponKind::Scatter).unwrap(), r#""scatter""#);
    }
}
