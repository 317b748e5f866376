//! Explicitly owned set of spawn pools
//!
//! One pool per obstacle category (indexed by category id) plus a single pit
//! pool. The game session owns the registry and lends it to whichever system
//! needs to spawn.

use glam::{Quat, Vec3};

use super::object_pool::{Pool, PoolError, PoolIndex, PoolSpec};
use super::pooled::{CategoryId, PooledObject};
use crate::core::PoolsConfig;

/// Category id reported for pit segments.
const PIT_CATEGORY: CategoryId = CategoryId::MAX;

/// Handle to an entity owned by a [`PoolRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolHandle {
    /// Obstacle from the pool of the given category
    Obstacle {
        /// Obstacle category
        category: CategoryId,
        /// Entry in that category's pool
        index: PoolIndex,
    },
    /// Pit segment
    Pit(PoolIndex),
}

/// Obstacle pools keyed by category id, plus the pit pool.
#[derive(Debug)]
pub struct PoolRegistry {
    obstacles: Vec<Pool<PooledObject>>,
    pits: Pool<PooledObject>,
}

impl PoolRegistry {
    /// Build every pool described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroCapacity`] if any pool has capacity 0.
    pub fn from_config(config: &PoolsConfig) -> Result<Self, PoolError> {
        let specs: Vec<PoolSpec<PooledObject>> = config
            .obstacles
            .iter()
            .enumerate()
            .map(|(category, proto)| {
                PoolSpec::new(PooledObject::new(proto.name.clone(), category), proto.capacity)
            })
            .collect();

        let obstacles = Pool::populated(&specs)?;
        let pits = Pool::new(PooledObject::new(config.pit.name.clone(), PIT_CATEGORY), config.pit.capacity)?;

        log::info!(
            "Pools ready: {} obstacle categories ({} entries), {} pit entries",
            obstacles.len(),
            obstacles.iter().map(Pool::capacity).sum::<usize>(),
            pits.capacity()
        );

        Ok(Self { obstacles, pits })
    }

    /// Assemble a registry from pools built elsewhere.
    pub fn new(obstacles: Vec<Pool<PooledObject>>, pits: Pool<PooledObject>) -> Self {
        Self { obstacles, pits }
    }

    /// Number of obstacle categories.
    #[must_use]
    pub fn obstacle_categories(&self) -> usize {
        self.obstacles.len()
    }

    /// Spawn an obstacle of `category`. Returns `None` for an unknown category.
    pub fn request_obstacle(
        &mut self,
        category: CategoryId,
        position: Vec3,
        rotation: Quat,
    ) -> Option<PoolHandle> {
        let Some(pool) = self.obstacles.get_mut(category) else {
            log::warn!("Requested obstacle from unknown category {category}");
            return None;
        };

        let index = pool.recycle(position, rotation);
        Some(PoolHandle::Obstacle { category, index })
    }

    /// Spawn a pit segment.
    pub fn request_pit(&mut self, position: Vec3, rotation: Quat) -> PoolHandle {
        PoolHandle::Pit(self.pits.recycle(position, rotation))
    }

    /// Return an entity to its pool. Untracked handles are ignored.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match handle {
            PoolHandle::Obstacle { category, index } => self
                .obstacles
                .get_mut(category)
                .is_some_and(|pool| pool.release(index)),
            PoolHandle::Pit(index) => self.pits.release(index),
        }
    }

    /// Look up a pooled entity.
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&PooledObject> {
        match handle {
            PoolHandle::Obstacle { category, index } => {
                self.obstacles.get(category).and_then(|pool| pool.get(index))
            }
            PoolHandle::Pit(index) => self.pits.get(index),
        }
    }

    /// Look up a pooled entity mutably.
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut PooledObject> {
        match handle {
            PoolHandle::Obstacle { category, index } => self
                .obstacles
                .get_mut(category)
                .and_then(|pool| pool.get_mut(index)),
            PoolHandle::Pit(index) => self.pits.get_mut(index),
        }
    }

    /// Whether the handle refers to a live entity.
    #[must_use]
    pub fn is_live(&self, handle: PoolHandle) -> bool {
        match handle {
            PoolHandle::Obstacle { category, index } => self
                .obstacles
                .get(category)
                .is_some_and(|pool| pool.is_in_use(index)),
            PoolHandle::Pit(index) => self.pits.is_in_use(index),
        }
    }

    /// Iterate over every live obstacle.
    pub fn active_obstacles(&self) -> impl Iterator<Item = (PoolHandle, &PooledObject)> {
        self.obstacles.iter().enumerate().flat_map(|(category, pool)| {
            pool.iter_in_use()
                .map(move |(index, object)| (PoolHandle::Obstacle { category, index }, object))
        })
    }

    /// Iterate over every live pit segment.
    pub fn active_pits(&self) -> impl Iterator<Item = (PoolHandle, &PooledObject)> {
        self.pits
            .iter_in_use()
            .map(|(index, object)| (PoolHandle::Pit(index), object))
    }

    /// Number of live obstacles across all categories.
    #[must_use]
    pub fn live_obstacle_count(&self) -> usize {
        self.obstacles.iter().map(Pool::in_use_count).sum()
    }

    /// Return every entity to its pool.
    pub fn release_all(&mut self) {
        for pool in &mut self.obstacles {
            pool.release_all();
        }
        self.pits.release_all();
    }
}
