//! Ground queries against the terrain heightfield and standable props

use crate::object::ObjectKind;
use crate::world::CollisionWorld;
use glam::Vec3;
use outpost_core::{HeightField, ObjectId};

/// Local slope of the terrain under a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeInfo {
    /// Estimated surface normal (unit length, y up)
    pub normal: Vec3,
    /// Angle between the normal and world up, radians
    pub angle: f32,
    /// Steeper than the configured limit
    pub should_slide: bool,
    /// Horizontal downhill direction (zero on flat ground)
    pub slide_direction: Vec3,
}

impl SlopeInfo {
    /// Flat ground
    pub const FLAT: Self = Self {
        normal: Vec3::Y,
        angle: 0.0,
        should_slide: false,
        slide_direction: Vec3::ZERO,
    };
}

/// Result of a ground check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundInfo {
    /// Sphere bottom within tolerance of the terrain
    pub is_grounded: bool,
    /// Terrain height under the sphere
    pub height: f32,
    /// Terrain slope under the sphere
    pub slope: SlopeInfo,
}

/// Highest walkable surface under a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHeight {
    /// Height of the surface
    pub height: f32,
    /// The standable prop providing it, if not the terrain
    pub object: Option<ObjectId>,
}

/// Estimate terrain slope with four samples around (x, z).
///
/// The normal is built from central differences: `(hl - hr, 2d, hd - hu)`
/// normalized, where `d` is the sample offset.
pub fn estimate_slope(terrain: &dyn HeightField, x: f32, z: f32, offset: f32, max_angle: f32) -> SlopeInfo {
    let d = offset.max(1e-3);
    let hl = terrain.sample(x - d, z);
    let hr = terrain.sample(x + d, z);
    let hd = terrain.sample(x, z - d);
    let hu = terrain.sample(x, z + d);

    let normal = Vec3::new(hl - hr, 2.0 * d, hd - hu).normalize_or_zero();
    if normal == Vec3::ZERO {
        return SlopeInfo::FLAT;
    }

    let angle = normal.dot(Vec3::Y).clamp(-1.0, 1.0).acos();
    SlopeInfo {
        normal,
        angle,
        should_slide: angle > max_angle,
        slide_direction: Vec3::new(normal.x, 0.0, normal.z).normalize_or_zero(),
    }
}

impl CollisionWorld {
    /// Check a sphere against the terrain
    pub fn ground_check(&self, position: Vec3, radius: f32, terrain: &dyn HeightField) -> GroundInfo {
        let height = terrain.sample(position.x, position.z);
        let bottom = position.y - radius;
        GroundInfo {
            is_grounded: bottom <= height + self.config.ground_tolerance,
            height,
            slope: estimate_slope(
                terrain,
                position.x,
                position.z,
                self.config.slope_sample_offset,
                self.config.max_slope_angle,
            ),
        }
    }

    /// Highest surface a sphere can stand on: terrain or a standable prop.
    ///
    /// A prop counts when its footprint is within `radius` horizontally, its
    /// top is above the terrain and no more than `max_step_height` above the
    /// sphere's feet.
    pub fn standable_surface(&self, position: Vec3, radius: f32, terrain: &dyn HeightField) -> SurfaceHeight {
        let terrain_height = terrain.sample(position.x, position.z);
        let feet = position.y - radius;
        let reach = feet + self.config.max_step_height;

        let mut best = SurfaceHeight {
            height: terrain_height,
            object: None,
        };

        for id in self.index.query_radius(position, radius) {
            let Some(object) = self.objects.get(&id) else {
                continue;
            };
            if object.kind != ObjectKind::StandableProp {
                continue;
            }
            let Some(top) = object.standable_top else {
                continue;
            };
            if top <= best.height || top > reach {
                continue;
            }
            if object.footprint_distance(position) <= radius {
                best = SurfaceHeight {
                    height: top,
                    object: Some(id),
                };
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Bounds, WorldObject};
    use approx::assert_relative_eq;
    use outpost_core::FlatGround;

    #[test]
    fn test_flat_ground() {
        let world = CollisionWorld::default();
        let ground = FlatGround::new(0.0);

        let info = world.ground_check(Vec3::new(0.0, 0.55, 0.0), 0.5, &ground);
        assert!(info.is_grounded);
        assert_relative_eq!(info.slope.angle, 0.0, epsilon = 1e-5);
        assert!(!info.slope.should_slide);
        assert_eq!(info.slope.slide_direction, Vec3::ZERO);

        let airborne = world.ground_check(Vec3::new(0.0, 2.0, 0.0), 0.5, &ground);
        assert!(!airborne.is_grounded);
    }

    #[test]
    fn test_steep_slope_slides_downhill() {
        let world = CollisionWorld::default();
        // Rises 2 units per unit along +x: ~63 degrees
        let ramp = |x: f32, _z: f32| 2.0 * x;

        let info = world.ground_check(Vec3::new(1.0, 2.5, 0.0), 0.5, &ramp);
        assert!(info.slope.should_slide);
        assert_relative_eq!(info.slope.angle, 2f32.atan(), epsilon = 1e-4);
        assert_relative_eq!(info.slope.slide_direction.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gentle_slope_does_not_slide() {
        let world = CollisionWorld::default();
        let ramp = |_x: f32, z: f32| 0.2 * z;
        let info = world.ground_check(Vec3::ZERO, 0.5, &ramp);
        assert!(!info.slope.should_slide);
        assert!(info.slope.angle > 0.0);
    }

    #[test]
    fn test_non_finite_terrain_reads_as_zero() {
        let world = CollisionWorld::default();
        let broken = |_x: f32, _z: f32| f32::NAN;
        let info = world.ground_check(Vec3::new(0.0, 0.5, 0.0), 0.5, &broken);
        assert_eq!(info.height, 0.0);
        assert!(info.is_grounded);
    }

    #[test]
    fn test_standable_surface() {
        let mut world = CollisionWorld::default();
        let crate_id = ObjectId::World(1);
        world
            .insert_object(WorldObject::standable(
                crate_id,
                Vec3::new(0.0, 0.2, 0.0),
                Bounds::cuboid(1.0, 0.2, 1.0),
            ))
            .unwrap();
        let ground = FlatGround::new(0.0);

        // Feet at 0.0, crate top at 0.4: within step height
        let surface = world.standable_surface(Vec3::new(0.5, 0.5, 0.0), 0.5, &ground);
        assert_eq!(surface.object, Some(crate_id));
        assert_relative_eq!(surface.height, 0.4, epsilon = 1e-5);

        // Far away horizontally: terrain
        let surface = world.standable_surface(Vec3::new(5.0, 0.5, 0.0), 0.5, &ground);
        assert_eq!(surface.object, None);
        assert_eq!(surface.height, 0.0);
    }

    #[test]
    fn test_standable_top_too_high_is_ignored() {
        let mut world = CollisionWorld::default();
        world
            .insert_object(WorldObject::standable(
                ObjectId::World(1),
                Vec3::new(0.0, 1.0, 0.0),
                Bounds::cuboid(1.0, 1.0, 1.0),
            ))
            .unwrap();

        let surface = world.standable_surface(Vec3::new(0.0, 0.5, 0.0), 0.5, &FlatGround::new(0.0));
        assert_eq!(surface.object, None);
    }

    #[test]
    fn test_barriers_are_not_standable() {
        let mut world = CollisionWorld::default();
        world
            .insert_object(
                WorldObject::barrier(ObjectId::World(1), Vec3::ZERO, Bounds::cuboid(1.0, 0.1, 1.0))
                    .with_standable_top(0.1),
            )
            .unwrap();

        let surface = world.standable_surface(Vec3::new(0.0, 0.5, 0.0), 0.5, &FlatGround::new(0.0));
        assert_eq!(surface.object, None);
    }
}
