//! World objects and their collision bounds

use glam::{Vec2, Vec3};
use outpost_core::ObjectId;
use serde::{Deserialize, Serialize};

/// What a world object is, as far as collision is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Walls, fences, rocks: blocks movement
    Barrier,
    /// Blocks movement and can be stood on
    StandableProp,
    /// A hostile agent's body
    Agent,
    /// Loot and other pickups; never blocks movement
    Pickup,
}

impl ObjectKind {
    /// Whether moving bodies are pushed out of this kind
    pub fn is_solid(self) -> bool {
        !matches!(self, ObjectKind::Pickup)
    }
}

/// Collision bounds, centered on the object's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bounds {
    /// Bounding sphere
    Sphere { radius: f32 },
    /// Axis-aligned bounding box
    Box { half_extents: Vec3 },
}

impl Bounds {
    /// Create a sphere
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: Vec3::new(hx, hy, hz),
        }
    }

    /// Half-size of the square XZ footprint covering these bounds
    pub fn horizontal_extent(&self) -> f32 {
        match self {
            Bounds::Sphere { radius } => *radius,
            Bounds::Box { half_extents } => half_extents.x.max(half_extents.z),
        }
    }

    /// Whether every dimension is finite and non-negative
    pub fn is_valid(&self) -> bool {
        match self {
            Bounds::Sphere { radius } => radius.is_finite() && *radius >= 0.0,
            Bounds::Box { half_extents } => {
                half_extents.is_finite() && half_extents.cmpge(Vec3::ZERO).all()
            }
        }
    }
}

/// An object placed in the collision world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Stable id; the variant names the owning subsystem
    pub id: ObjectId,
    /// Object kind
    pub kind: ObjectKind,
    /// Center of the bounds
    pub position: Vec3,
    /// Collision bounds
    pub bounds: Bounds,
    /// Never moves after placement
    pub is_static: bool,
    /// Height of the walkable top surface, for standable props
    pub standable_top: Option<f32>,
}

impl WorldObject {
    /// Create a static barrier
    pub fn barrier(id: ObjectId, position: Vec3, bounds: Bounds) -> Self {
        Self {
            id,
            kind: ObjectKind::Barrier,
            position,
            bounds,
            is_static: true,
            standable_top: None,
        }
    }

    /// Create a standable prop. The top defaults to the top of the bounds.
    pub fn standable(id: ObjectId, position: Vec3, bounds: Bounds) -> Self {
        let top = match bounds {
            Bounds::Sphere { radius } => position.y + radius,
            Bounds::Box { half_extents } => position.y + half_extents.y,
        };
        Self {
            id,
            kind: ObjectKind::StandableProp,
            position,
            bounds,
            is_static: true,
            standable_top: Some(top),
        }
    }

    /// Create a moving agent body
    pub fn agent(id: ObjectId, position: Vec3, radius: f32) -> Self {
        Self {
            id,
            kind: ObjectKind::Agent,
            position,
            bounds: Bounds::sphere(radius),
            is_static: false,
            standable_top: None,
        }
    }

    /// Create a pickup
    pub fn pickup(id: ObjectId, position: Vec3, radius: f32) -> Self {
        Self {
            id,
            kind: ObjectKind::Pickup,
            position,
            bounds: Bounds::sphere(radius),
            is_static: true,
            standable_top: None,
        }
    }

    /// Override the standable top height
    pub fn with_standable_top(mut self, top: f32) -> Self {
        self.standable_top = Some(top);
        self
    }

    /// Mark as semi-static (can be moved by its owner)
    pub fn movable(mut self) -> Self {
        self.is_static = false;
        self
    }

    /// Horizontal distance from a point to the object's footprint (0 inside)
    pub fn footprint_distance(&self, point: Vec3) -> f32 {
        let p = Vec2::new(point.x, point.z);
        let c = Vec2::new(self.position.x, self.position.z);
        match self.bounds {
            Bounds::Sphere { radius } => ((p - c).length() - radius).max(0.0),
            Bounds::Box { half_extents } => {
                let half = Vec2::new(half_extents.x, half_extents.z);
                let closest = p.clamp(c - half, c + half);
                (p - closest).length()
            }
        }
    }
}
