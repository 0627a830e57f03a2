//! What the combat resolver shoots at

use crate::damage::DamageInfo;
use glam::Vec3;
use outpost_core::AgentId;

/// A live, hittable target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    /// Agent id
    pub id: AgentId,
    /// Hit sphere center
    pub position: Vec3,
    /// Hit sphere radius
    pub hit_radius: f32,
}

/// What the target owner did with a damage request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResponse {
    /// Not applied: unknown or dead target, or an invalid amount
    Rejected,
    /// Applied, target still alive
    Wounded,
    /// Applied and the target died
    Killed,
}

impl DamageResponse {
    pub fn is_applied(self) -> bool {
        self != Self::Rejected
    }

    pub fn is_lethal(self) -> bool {
        self == Self::Killed
    }
}

/// Owner of the targets a discharge can hit.
///
/// Implemented by the enemy director; the resolver never mutates targets
/// except through [`request_damage`](CombatTargets::request_damage).
pub trait CombatTargets {
    /// Every target currently alive
    fn live_targets(&self) -> Vec<TargetInfo>;

    /// Apply damage to a target
    fn request_damage(&mut self, target: AgentId, damage: &DamageInfo) -> DamageResponse;
}

/// Closest approach of a ray to a sphere center.
///
/// `direction` must be normalized. Returns the distance along the ray and the
/// closest point on the ray when the target is in front of the origin, within
/// `range` and the closest point lies inside `radius`.
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, range: f32, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let t = (center - origin).dot(direction);
    if t < 0.0 || t > range {
        return None;
    }

    let closest = origin + direction * t;
    if closest.distance_squared(center) <= radius * radius {
        Some((t, closest))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_sphere_in_front() {
        let hit = ray_sphere_hit(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, 100.0, Vec3::ZERO, 0.8);
        let (distance, point) = hit.unwrap();
        assert_relative_eq!(distance, 10.0);
        assert_eq!(point, Vec3::ZERO);
    }

    #[test]
    fn test_ray_rejects_behind_and_out_of_range() {
        assert!(ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, 100.0, Vec3::ZERO, 0.8).is_none());
        assert!(ray_sphere_hit(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, 5.0, Vec3::ZERO, 0.8).is_none());
    }

    #[test]
    fn test_damage_response() {
        assert!(!DamageResponse::Rejected.is_applied());
        assert!(DamageResponse::Wounded.is_applied());
        assert!(!DamageResponse::Wounded.is_lethal());
        assert!(DamageResponse::Killed.is_lethal());
    }

    #[test]
    fn test_ray_misses_wide() {
        let hit = ray_sphere_hit(Vec3::new(1.0, 0.0, -10.0), Vec3::Z, 100.0, Vec3::ZERO, 0.8);
        assert!(hit.is_none());
    }
}
