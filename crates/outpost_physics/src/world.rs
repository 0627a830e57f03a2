//! Collision world - object store plus spatial index

use crate::config::CollisionConfig;
use crate::error::{PhysicsError, Result};
use crate::grid::SpatialIndex;
use crate::object::WorldObject;
use glam::Vec3;
use outpost_core::ObjectId;
use std::collections::HashMap;

/// Objects that moving bodies collide with, indexed for broad-phase queries.
///
/// Each object is registered by the subsystem that owns it (the building
/// system for static content, the enemy director for agent bodies) and only
/// that owner updates or removes it.
#[derive(Debug)]
pub struct CollisionWorld {
    /// Configuration
    pub(crate) config: CollisionConfig,

    /// Registered objects
    pub(crate) objects: HashMap<ObjectId, WorldObject>,

    /// Broad phase
    pub(crate) index: SpatialIndex,
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new(config: CollisionConfig) -> Self {
        let index = SpatialIndex::new(config.cell_size);
        Self {
            config,
            objects: HashMap::new(),
            index,
        }
    }

    /// Configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Register an object
    pub fn insert_object(&mut self, object: WorldObject) -> Result<()> {
        if self.objects.contains_key(&object.id) {
            return Err(PhysicsError::DuplicateObject(object.id));
        }
        if !object.bounds.is_valid() || !object.position.is_finite() {
            return Err(PhysicsError::InvalidShape {
                id: object.id,
                reason: format!("{:?} at {:?}", object.bounds, object.position),
            });
        }

        self.index
            .insert(object.id, object.position, object.bounds.horizontal_extent());
        log::trace!("Inserted {} ({:?})", object.id, object.kind);
        self.objects.insert(object.id, object);
        Ok(())
    }

    /// Remove an object, returning it if it was registered
    pub fn remove_object(&mut self, id: ObjectId) -> Option<WorldObject> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            self.index.remove(id);
        }
        removed
    }

    /// Move an object. Returns false for unknown ids or non-finite positions.
    pub fn update_object_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        if !position.is_finite() {
            log::warn!("Ignoring non-finite position for {}: {:?}", id, position);
            return false;
        }
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        object.position = position;
        self.index.update(id, position)
    }

    /// Look up an object
    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Whether an object is registered
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// All registered objects (unordered)
    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Read access to the broad phase
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Remove every object matching a predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&WorldObject) -> bool) {
        let doomed: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|o| !keep(o))
            .map(|o| o.id)
            .collect();
        for id in doomed {
            self.remove_object(id);
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Bounds;

    #[test]
    fn test_insert_and_remove() {
        let mut world = CollisionWorld::default();
        let id = ObjectId::World(1);
        world
            .insert_object(WorldObject::barrier(id, Vec3::ZERO, Bounds::sphere(1.0)))
            .unwrap();

        assert!(world.contains(id));
        assert!(world.index().contains(id));

        let err = world
            .insert_object(WorldObject::barrier(id, Vec3::ZERO, Bounds::sphere(1.0)))
            .unwrap_err();
        assert!(matches!(err, PhysicsError::DuplicateObject(_)));

        assert!(world.remove_object(id).is_some());
        assert!(!world.index().contains(id));
        assert!(world.remove_object(id).is_none());
    }

    #[test]
    fn test_update_position_keeps_index_in_sync() {
        let mut world = CollisionWorld::default();
        let id = ObjectId::World(1);
        world
            .insert_object(WorldObject::barrier(id, Vec3::ZERO, Bounds::sphere(1.0)).movable())
            .unwrap();

        let target = Vec3::new(55.0, 0.0, -20.0);
        assert!(world.update_object_position(id, target));
        assert_eq!(world.object(id).map(|o| o.position), Some(target));
        assert_eq!(world.index().position_of(id), Some(target));

        assert!(!world.update_object_position(ObjectId::World(2), target));
        assert!(!world.update_object_position(id, Vec3::NAN));
    }

    #[test]
    fn test_rejects_invalid_shape() {
        let mut world = CollisionWorld::default();
        let result = world.insert_object(WorldObject::barrier(
            ObjectId::World(1),
            Vec3::ZERO,
            Bounds::sphere(-1.0),
        ));
        assert!(matches!(result, Err(PhysicsError::InvalidShape { .. })));
        assert!(world.is_empty());
    }

    #[test]
    fn test_retain() {
        let mut world = CollisionWorld::default();
        world
            .insert_object(WorldObject::barrier(ObjectId::World(1), Vec3::ZERO, Bounds::sphere(1.0)))
            .unwrap();
        world
            .insert_object(WorldObject::pickup(
                ObjectId::World(2),
                Vec3::new(3.0, 0.0, 0.0),
                0.5,
            ))
            .unwrap();

        world.retain(|o| o.kind.is_solid());
        assert_eq!(world.len(), 1);
        assert_eq!(world.index().len(), 1);
    }
}
