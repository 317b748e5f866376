//! Entities that can live in a recycling pool

use glam::{Quat, Vec3};

use crate::core::Transform;

/// Integer id of an obstacle category (index into the registry's pools).
pub type CategoryId = usize;

/// Behaviour a pool needs from its entities.
pub trait Poolable {
    /// Restore the entity to its freshly built state.
    ///
    /// Called when an in-use entity is reclaimed for a new spawn.
    fn reset(&mut self) {}

    /// Move the entity to a spawn position and rotation and mark it live.
    fn place(&mut self, position: Vec3, rotation: Quat);

    /// Called when the entity is handed back to the pool.
    fn retire(&mut self) {}
}

/// A pooled scene object: obstacle, pit segment or any other spawnable prop.
#[derive(Debug, Clone, PartialEq)]
pub struct PooledObject {
    /// Prototype name the object was built from
    pub name: String,
    /// Category the object belongs to
    pub category: CategoryId,
    /// Current placement
    pub transform: Transform,
    /// Whether the object is live in the world
    pub active: bool,
    /// How many times the object has been placed
    pub spawn_count: u32,
}

impl PooledObject {
    /// Create an inactive object at the origin
    pub fn new(name: impl Into<String>, category: CategoryId) -> Self {
        Self {
            name: name.into(),
            category,
            transform: Transform::default(),
            active: false,
            spawn_count: 0,
        }
    }
}

impl Poolable for PooledObject {
    fn reset(&mut self) {
        self.transform = Transform::default();
        self.active = false;
    }

    fn place(&mut self, position: Vec3, rotation: Quat) {
        self.transform.place(position, rotation);
        self.active = true;
        self.spawn_count += 1;
    }

    fn retire(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_activates() {
        let mut object = PooledObject::new("rock", 2);
        object.place(Vec3::Y, Quat::IDENTITY);

        assert!(object.active);
        assert_eq!(object.transform.position, Vec3::Y);
        assert_eq!(object.spawn_count, 1);
    }

    #[test]
    fn test_reset_keeps_identity() {
        let mut object = PooledObject::new("rock", 2);
        object.place(Vec3::Y, Quat::from_rotation_x(1.0));
        object.reset();

        assert!(!object.active);
        assert_eq!(object.transform, Transform::default());
        assert_eq!(object.name, "rock");
        assert_eq!(object.category, 2);
    }
}
