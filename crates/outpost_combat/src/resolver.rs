//! Fire resolution

use crate::config::CombatConfig;
use crate::damage::DamageInfo;
use crate::target::{ray_sphere_hit, CombatTargets, TargetInfo};
use crate::weapon::{WeaponKind, WeaponStats};
use glam::Vec3;
use outpost_core::{AgentId, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

/// One accepted hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Agent that was hit
    pub agent_id: AgentId,
    /// Damage applied
    pub damage: f32,
    /// Closest point on the ray to the agent center
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Whether the hit killed the agent
    pub lethal: bool,
}

/// Visual extent of a discharge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub start: Vec3,
    pub end: Vec3,
}

/// Outcome of a fire request
#[derive(Debug, Clone, PartialEq)]
pub struct FireResult {
    /// At least one hit was accepted
    pub hit: bool,
    /// Accepted hits, in pellet order
    pub hits: Vec<HitRecord>,
    /// Trail from the muzzle to the nearest hit or the range limit
    pub trail: Trail,
}

impl FireResult {
    /// A discharge that had no effect
    pub fn miss(start: Vec3, end: Vec3) -> Self {
        Self {
            hit: false,
            hits: Vec::new(),
            trail: Trail { start, end },
        }
    }

    /// Total damage applied
    pub fn total_damage(&self) -> f32 {
        self.hits.iter().map(|h| h.damage).sum()
    }
}

/// Rotate `direction` randomly within a cone of `half_angle` radians.
///
/// Directions are drawn uniformly over the cone's spherical cap.
pub fn apply_spread<R: Rng + ?Sized>(direction: Vec3, half_angle: f32, rng: &mut R) -> Vec3 {
    if !(half_angle > 0.0) {
        return direction;
    }

    let cos_max = half_angle.min(PI).cos();
    let cos_theta = rng.random_range(cos_max..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.random_range(0.0..TAU);

    let (u, v) = direction.any_orthonormal_pair();
    (direction * cos_theta + (u * phi.cos() + v * phi.sin()) * sin_theta).normalize_or_zero()
}

/// Resolves weapon discharges against live targets
#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    config: CombatConfig,
}

impl CombatResolver {
    /// Create a resolver
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    /// Configuration
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Resolve one trigger pull.
    ///
    /// The aim direction is perturbed by the weapon's accuracy spread. Scatter
    /// weapons then fire one ray per pellet, each with extra pellet spread
    /// and an equal share of the damage. Every ray keeps only its closest hit;
    /// a target killed by an earlier pellet is ignored by later ones. Hits
    /// the target owner refuses are left out of the result.
    pub fn fire<R: Rng + ?Sized>(
        &self,
        origin: Vec3,
        direction: Vec3,
        weapon: &WeaponStats,
        attacker: Option<PlayerId>,
        targets: &mut dyn CombatTargets,
        rng: &mut R,
    ) -> FireResult {
        let aim = direction.normalize_or_zero();
        if aim == Vec3::ZERO || !origin.is_finite() {
            log::warn!("Ignoring fire request with origin {:?} direction {:?}", origin, direction);
            return FireResult::miss(origin, origin);
        }
        if !(weapon.range > 0.0) || !weapon.range.is_finite() {
            log::warn!("Ignoring fire request with range {}", weapon.range);
            return FireResult::miss(origin, origin);
        }

        let aim = apply_spread(aim, self.config.spread_for(weapon.accuracy), rng);
        let pellets = weapon.projectile_count();
        let damage = weapon.damage_per_projectile();

        let candidates = targets.live_targets();
        // Killed, or refused damage earlier in this discharge
        let mut spent: HashSet<AgentId> = HashSet::new();
        let mut hits = Vec::new();
        let mut first_ray = aim;

        for pellet in 0..pellets {
            let ray = match weapon.kind {
                WeaponKind::Hitscan => aim,
                WeaponKind::Scatter => apply_spread(aim, self.config.pellet_spread, rng),
            };
            if pellet == 0 {
                first_ray = ray;
            }

            let Some((target, distance, point)) = closest_hit(origin, ray, weapon.range, &candidates, &spent) else {
                continue;
            };

            let info = DamageInfo::new(damage)
                .with_attacker(attacker)
                .with_hit(point, distance);
            let response = targets.request_damage(target.id, &info);
            if !response.is_applied() {
                log::debug!("{} refused {} damage", target.id, damage);
                spent.insert(target.id);
                continue;
            }
            if response.is_lethal() {
                spent.insert(target.id);
            }

            hits.push(HitRecord {
                agent_id: target.id,
                damage,
                point,
                distance,
                lethal: response.is_lethal(),
            });
        }

        let end = hits
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|h| h.point)
            .unwrap_or(origin + first_ray * weapon.range);

        if !hits.is_empty() {
            log::debug!("Discharge by {:?}: {} hit(s)", attacker, hits.len());
        }

        FireResult {
            hit: !hits.is_empty(),
            hits,
            trail: Trail { start: origin, end },
        }
    }
}

fn closest_hit<'a>(
    origin: Vec3,
    ray: Vec3,
    range: f32,
    candidates: &'a [TargetInfo],
    spent: &HashSet<AgentId>,
) -> Option<(&'a TargetInfo, f32, Vec3)> {
    candidates
        .iter()
        .filter(|t| !spent.contains(&t.id))
        .filter_map(|t| ray_sphere_hit(origin, ray, range, t.position, t.hit_radius).map(|(d, p)| (t, d, p)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
