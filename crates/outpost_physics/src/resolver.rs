//! Sphere collision resolution against world objects

use crate::object::{Bounds, WorldObject};
use crate::world::CollisionWorld;
use glam::Vec3;
use outpost_core::ObjectId;

/// Result of testing a sphere against the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereContact {
    /// Whether any object intersects the sphere
    pub has_collision: bool,
    /// Push-out direction (from the object toward the sphere)
    pub normal: Vec3,
    /// Overlap depth along the normal
    pub penetration: f32,
    /// Contact point on the object's surface
    pub contact_point: Vec3,
    /// The object that was hit
    pub object: Option<ObjectId>,
}

impl SphereContact {
    /// No collision
    pub const NONE: Self = Self {
        has_collision: false,
        normal: Vec3::ZERO,
        penetration: 0.0,
        contact_point: Vec3::ZERO,
        object: None,
    };
}

/// Result of resolving a movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResult {
    /// Corrected position
    pub position: Vec3,
    /// Velocity with inward components removed and damping applied
    pub velocity: Vec3,
    /// Whether any collision was handled
    pub collided: bool,
    /// Whether the final position is free of penetration
    pub resolved: bool,
    /// Number of sphere tests performed
    pub iterations: u32,
}

struct Overlap {
    normal: Vec3,
    penetration: f32,
    point: Vec3,
}

fn sphere_vs_sphere(center: Vec3, radius: f32, other: Vec3, other_radius: f32) -> Option<Overlap> {
    let delta = center - other;
    let distance = delta.length();
    let penetration = radius + other_radius - distance;
    if penetration <= 0.0 {
        return None;
    }

    // Coincident centers: push straight up
    let normal = if distance > 1e-6 { delta / distance } else { Vec3::Y };
    Some(Overlap {
        normal,
        penetration,
        point: other + normal * other_radius,
    })
}

fn sphere_vs_box(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> Option<Overlap> {
    let min = box_center - half_extents;
    let max = box_center + half_extents;
    let closest = center.clamp(min, max);
    let delta = center - closest;
    let distance_sq = delta.length_squared();

    if distance_sq > 1e-12 {
        if distance_sq >= radius * radius {
            return None;
        }
        let distance = distance_sq.sqrt();
        return Some(Overlap {
            normal: delta / distance,
            penetration: radius - distance,
            point: closest,
        });
    }

    // Center inside the box: leave through the nearest face
    let local = center - box_center;
    let face_gap = half_extents - local.abs();
    let (axis, gap) = [face_gap.x, face_gap.y, face_gap.z]
        .into_iter()
        .enumerate()
        .fold((0, f32::MAX), |best, (axis, gap)| if gap < best.1 { (axis, gap) } else { best });

    let mut normal = Vec3::ZERO;
    let sign = if local[axis] < 0.0 { -1.0 } else { 1.0 };
    normal[axis] = sign;

    let mut point = center;
    point[axis] = box_center[axis] + sign * half_extents[axis];

    Some(Overlap {
        normal,
        penetration: radius + gap,
        point,
    })
}

fn overlap_with(object: &WorldObject, center: Vec3, radius: f32) -> Option<Overlap> {
    match object.bounds {
        Bounds::Sphere { radius: r } => sphere_vs_sphere(center, radius, object.position, r),
        Bounds::Box { half_extents } => sphere_vs_box(center, radius, object.position, half_extents),
    }
}

impl CollisionWorld {
    /// Test a sphere against nearby solid objects.
    ///
    /// Candidates come from the 3x3 neighborhood of the sphere's cell and are
    /// tested in ascending id order; the first intersecting object wins.
    pub fn resolve_sphere(&self, position: Vec3, radius: f32, exclude: &[ObjectId]) -> SphereContact {
        let mut candidates = Vec::with_capacity(16);
        self.index.query_neighborhood_into(position, &mut candidates);

        for id in candidates {
            if exclude.contains(&id) {
                continue;
            }
            let Some(object) = self.objects.get(&id) else {
                continue;
            };
            if !object.kind.is_solid() {
                continue;
            }
            if let Some(overlap) = overlap_with(object, position, radius) {
                return SphereContact {
                    has_collision: true,
                    normal: overlap.normal,
                    penetration: overlap.penetration,
                    contact_point: overlap.point,
                    object: Some(id),
                };
            }
        }

        SphereContact::NONE
    }

    /// Push a proposed position out of the world and clip the velocity.
    ///
    /// `position` is where the body wants to be after integrating its
    /// velocity. Each collision pushes it out along the contact normal by
    /// `penetration + push_epsilon`, removes the velocity component heading
    /// into the surface and applies `collision_damping`. Stops as soon as the
    /// sphere is clear or after `max_iterations` tests.
    pub fn resolve_movement(
        &self,
        position: Vec3,
        radius: f32,
        velocity: Vec3,
        exclude: &[ObjectId],
    ) -> MovementResult {
        let mut result = MovementResult {
            position,
            velocity,
            collided: false,
            resolved: false,
            iterations: 0,
        };

        for _ in 0..self.config.max_iterations.max(1) {
            result.iterations += 1;
            let contact = self.resolve_sphere(result.position, radius, exclude);
            if !contact.has_collision {
                result.resolved = true;
                return result;
            }

            result.collided = true;
            result.position += contact.normal * (contact.penetration + self.config.push_epsilon);

            let into_surface = result.velocity.dot(contact.normal);
            if into_surface < 0.0 {
                result.velocity -= contact.normal * into_surface;
            }
            result.velocity *= self.config.collision_damping;
        }

        result.resolved = !self.resolve_sphere(result.position, radius, exclude).has_collision;
        if !result.resolved {
            log::debug!(
                "Movement at {:?} still penetrating after {} iterations",
                result.position,
                result.iterations
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionConfig;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn world_with(objects: Vec<WorldObject>) -> CollisionWorld {
        let mut world = CollisionWorld::new(CollisionConfig::default());
        for object in objects {
            world.insert_object(object).unwrap();
        }
        world
    }

    #[test]
    fn test_sphere_vs_sphere() {
        let world = world_with(vec![WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::sphere(1.0),
        )]);

        let contact = world.resolve_sphere(Vec3::new(1.5, 0.0, 0.0), 1.0, &[]);
        assert!(contact.has_collision);
        assert_eq!(contact.object, Some(ObjectId::World(1)));
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(contact.contact_point.x, 1.0, epsilon = 1e-5);

        // Just touching is not a collision
        let touching = world.resolve_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0, &[]);
        assert!(!touching.has_collision);
    }

    #[test]
    fn test_sphere_vs_box_face() {
        let world = world_with(vec![WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::cuboid(1.0, 1.0, 1.0),
        )]);

        let contact = world.resolve_sphere(Vec3::new(0.0, 0.0, 1.4), 0.5, &[]);
        assert!(contact.has_collision);
        assert_relative_eq!(contact.normal.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(contact.penetration, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_center_inside_box() {
        let world = world_with(vec![WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::cuboid(2.0, 2.0, 2.0),
        )]);

        let contact = world.resolve_sphere(Vec3::new(1.8, 0.0, 0.0), 0.5, &[]);
        assert!(contact.has_collision);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(contact.penetration, 0.7, epsilon = 1e-5);
    }

    #[test]
    fn test_exclude_and_pickups() {
        let world = world_with(vec![
            WorldObject::agent(ObjectId::World(1), Vec3::ZERO, 1.0),
            WorldObject::pickup(ObjectId::World(2), Vec3::ZERO, 1.0),
        ]);

        let contact = world.resolve_sphere(Vec3::ZERO, 0.5, &[ObjectId::World(1)]);
        assert!(!contact.has_collision);
    }

    #[test]
    fn test_resolve_movement_clips_velocity() {
        let world = world_with(vec![WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::cuboid(1.0, 5.0, 5.0),
        )]);

        // Moving in -x into the wall's +x face
        let result = world.resolve_movement(Vec3::new(1.3, 0.0, 0.0), 0.5, Vec3::new(-4.0, 0.0, 2.0), &[]);
        assert!(result.collided);
        assert!(result.resolved);
        assert!(result.position.x >= 1.5);
        // Inward component removed, tangential damped
        assert_relative_eq!(result.velocity.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(result.velocity.z, 2.0 * 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_resolve_movement_outward_velocity_untouched_direction() {
        let world = world_with(vec![WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::sphere(1.0),
        )]);

        let result = world.resolve_movement(Vec3::new(1.2, 0.0, 0.0), 0.5, Vec3::new(3.0, 0.0, 0.0), &[]);
        assert!(result.collided);
        // Already moving away: only damping applies
        assert_relative_eq!(result.velocity.x, 3.0 * 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_free_movement_is_untouched() {
        let world = CollisionWorld::default();
        let result = world.resolve_movement(Vec3::new(3.0, 1.0, 3.0), 0.5, Vec3::X, &[]);
        assert!(!result.collided);
        assert!(result.resolved);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.position, Vec3::new(3.0, 1.0, 3.0));
        assert_eq!(result.velocity, Vec3::X);
    }

    #[test]
    fn test_termination_and_zero_penetration() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut objects = Vec::new();
        for i in 0..40u64 {
            let p = Vec3::new(rng.random_range(-20.0..20.0), 0.0, rng.random_range(-20.0..20.0));
            let bounds = if i % 2 == 0 {
                Bounds::sphere(rng.random_range(0.5..2.0))
            } else {
                Bounds::cuboid(rng.random_range(0.5..2.0), 2.0, rng.random_range(0.5..2.0))
            };
            objects.push(WorldObject::barrier(ObjectId::World(i), p, bounds));
        }
        let world = world_with(objects);
        let max = world.config().max_iterations;

        for _ in 0..300 {
            let p = Vec3::new(rng.random_range(-22.0..22.0), 0.0, rng.random_range(-22.0..22.0));
            let v = Vec3::new(rng.random_range(-5.0..5.0), 0.0, rng.random_range(-5.0..5.0));
            let result = world.resolve_movement(p, 0.5, v, &[]);

            assert!(result.iterations <= max);
            if result.resolved {
                let check = world.resolve_sphere(result.position, 0.5, &[]);
                assert!(!check.has_collision);
            }
        }
    }
}
