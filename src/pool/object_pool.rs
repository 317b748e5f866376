//! Fixed-Capacity Recycling Object Pool
//!
//! This module provides a generic pool that pre-builds every entity up front
//! and hands them out again and again. Spawning an obstacle or a pit segment
//! never allocates: the pool only flips an in-use flag and moves the entity to
//! its new spawn transform.
//!
//! # Design Principles
//!
//! - **Pre-warmed**: All `capacity` entities are built when the pool is created
//! - **Fixed Size**: Entries are never added, removed or reallocated
//! - **Always Answers**: `recycle` reclaims the oldest claimed entity when full
//! - **Forgiving Release**: Releasing an unknown or free handle is a no-op
//!
//! # Example
//!
//! ```ignore
//! use crate::pool::{Pool, PooledObject};
//!
//! let mut pool = Pool::new(PooledObject::new("rock", 0), 16)?;
//!
//! // Claim an entity at a spawn transform
//! let handle = pool.recycle(Vec3::new(0.0, 0.0, 10.0), Quat::IDENTITY);
//!
//! // Hand it back when the host decides it's gone
//! pool.release(handle);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Quat, Vec3};

use super::pooled::Poolable;

/// Source of unique pool identities, so handles from one pool are never
/// mistaken for entries of another.
static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

// ============================================================================
// Pool Index
// ============================================================================

/// Handle to one entry of a specific pool.
///
/// A handle stays meaningful after release: it simply refers to a free entry
/// until the pool hands that entry out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolIndex {
    pool: u32,
    slot: usize,
}

impl PoolIndex {
    /// Position of the entry inside its pool (0..capacity).
    #[must_use]
    #[inline]
    pub const fn slot(self) -> usize {
        self.slot
    }

    /// Identity of the pool that issued this handle.
    #[must_use]
    #[inline]
    pub const fn pool_id(self) -> u32 {
        self.pool
    }
}

// ============================================================================
// Pool Entry
// ============================================================================

#[derive(Debug)]
struct Entry<T> {
    entity: T,
    in_use: bool,
    /// Value of the pool's claim counter when this entry was last claimed
    claimed_at: u64,
}

/// Construction parameters for one pool.
#[derive(Debug, Clone)]
pub struct PoolSpec<T> {
    /// Entity every entry is cloned from
    pub prototype: T,
    /// Number of entries
    pub capacity: usize,
}

impl<T> PoolSpec<T> {
    /// Create a spec
    pub fn new(prototype: T, capacity: usize) -> Self {
        Self {
            prototype,
            capacity,
        }
    }
}

// ============================================================================
// Object Pool
// ============================================================================

/// A fixed-capacity pool of reusable entities.
///
/// # Performance Characteristics
///
/// | Operation | Time Complexity |
/// |-----------|-----------------|
/// | `recycle` | O(n)            |
/// | `release` | O(1)            |
/// | `get`     | O(1)            |
///
/// Pools hold tens of entries, so the linear scan that keeps claims in index
/// order is cheaper than maintaining a free list.
pub struct Pool<T> {
    id: u32,
    entries: Box<[Entry<T>]>,
    /// Monotonic claim counter used to find the oldest claimed entry
    claims: u64,
    in_use: usize,
}

impl<T> Pool<T> {
    /// Build a pool whose entries are clones of `prototype`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroCapacity`] if `capacity` is 0.
    pub fn new(prototype: T, capacity: usize) -> Result<Self, PoolError>
    where
        T: Clone,
    {
        Self::from_fn(capacity, |_| prototype.clone())
    }

    /// Build a pool, creating entry `i` with `build(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroCapacity`] if `capacity` is 0.
    pub fn from_fn(capacity: usize, mut build: impl FnMut(usize) -> T) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        let entries: Vec<Entry<T>> = (0..capacity)
            .map(|slot| Entry {
                entity: build(slot),
                in_use: false,
                claimed_at: 0,
            })
            .collect();

        Ok(Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            entries: entries.into_boxed_slice(),
            claims: 0,
            in_use: 0,
        })
    }

    /// Build one pool per spec, in order. Pool `i` serves category `i`.
    ///
    /// # Errors
    ///
    /// Returns the first construction error encountered.
    pub fn populated(specs: &[PoolSpec<T>]) -> Result<Vec<Self>, PoolError>
    where
        T: Clone,
    {
        specs
            .iter()
            .map(|spec| Self::new(spec.prototype.clone(), spec.capacity))
            .collect()
    }

    /// Identity of this pool.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Whether `index` was issued by this pool.
    #[must_use]
    #[inline]
    pub fn owns(&self, index: PoolIndex) -> bool {
        index.pool == self.id && index.slot < self.entries.len()
    }

    /// Get an entity by handle, whether in use or free.
    #[must_use]
    #[inline]
    pub fn get(&self, index: PoolIndex) -> Option<&T> {
        if !self.owns(index) {
            return None;
        }
        self.entries.get(index.slot).map(|entry| &entry.entity)
    }

    /// Get an entity mutably by handle, whether in use or free.
    #[inline]
    pub fn get_mut(&mut self, index: PoolIndex) -> Option<&mut T> {
        if !self.owns(index) {
            return None;
        }
        self.entries.get_mut(index.slot).map(|entry| &mut entry.entity)
    }

    /// Whether the handle refers to an entry that is currently claimed.
    #[must_use]
    #[inline]
    pub fn is_in_use(&self, index: PoolIndex) -> bool {
        self.owns(index) && self.entries[index.slot].in_use
    }

    /// Number of entries (fixed at construction).
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of claimed entries.
    #[must_use]
    #[inline]
    pub const fn in_use_count(&self) -> usize {
        self.in_use
    }

    /// Number of free entries.
    #[must_use]
    #[inline]
    pub fn free_count(&self) -> usize {
        self.entries.len() - self.in_use
    }

    /// Whether every entry is claimed.
    #[must_use]
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.in_use == self.entries.len()
    }

    /// Iterate over claimed entities with their handles, in index order.
    pub fn iter_in_use(&self) -> impl Iterator<Item = (PoolIndex, &T)> {
        let pool = self.id;
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.in_use)
            .map(move |(slot, entry)| (PoolIndex { pool, slot }, &entry.entity))
    }

    fn first_free(&self) -> Option<usize> {
        self.entries.iter().position(|entry| !entry.in_use)
    }

    fn oldest_claimed(&self) -> usize {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.in_use)
            .min_by_key(|(_, entry)| entry.claimed_at)
            .map_or(0, |(slot, _)| slot)
    }
}

impl<T: Poolable> Pool<T> {
    /// Claim an entity and place it at the given spawn transform.
    ///
    /// Takes the first free entry in index order. When every entry is in use,
    /// the entry claimed longest ago is reset and reused, so this never fails.
    pub fn recycle(&mut self, position: Vec3, rotation: Quat) -> PoolIndex {
        let slot = match self.first_free() {
            Some(slot) => slot,
            None => {
                let slot = self.oldest_claimed();
                log::debug!(
                    "Pool {} saturated ({} entries), reclaiming slot {}",
                    self.id,
                    self.entries.len(),
                    slot
                );
                let entry = &mut self.entries[slot];
                entry.entity.reset();
                entry.in_use = false;
                self.in_use -= 1;
                slot
            }
        };

        self.claim(slot, position, rotation)
    }

    /// Claim a free entity, refusing when the pool is saturated.
    pub fn try_recycle(&mut self, position: Vec3, rotation: Quat) -> Option<PoolIndex> {
        let slot = self.first_free()?;
        Some(self.claim(slot, position, rotation))
    }

    /// Return an entity to the pool.
    ///
    /// Returns `false` (and does nothing) if the handle belongs to another
    /// pool or the entry is already free.
    pub fn release(&mut self, index: PoolIndex) -> bool {
        if !self.is_in_use(index) {
            return false;
        }

        let entry = &mut self.entries[index.slot];
        entry.in_use = false;
        entry.entity.retire();
        self.in_use -= 1;

        log::trace!("Pool {} released slot {}", self.id, index.slot);
        true
    }

    /// Return every claimed entity to the pool.
    pub fn release_all(&mut self) {
        for entry in self.entries.iter_mut().filter(|entry| entry.in_use) {
            entry.in_use = false;
            entry.entity.retire();
        }
        self.in_use = 0;
    }

    fn claim(&mut self, slot: usize, position: Vec3, rotation: Quat) -> PoolIndex {
        self.claims += 1;

        let entry = &mut self.entries[slot];
        entry.in_use = true;
        entry.claimed_at = self.claims;
        entry.entity.place(position, rotation);
        self.in_use += 1;

        log::trace!("Pool {} claimed slot {} at {:?}", self.id, slot, position);
        PoolIndex {
            pool: self.id,
            slot,
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("capacity", &self.entries.len())
            .field("in_use", &self.in_use)
            .finish()
    }
}

/// Errors raised when constructing a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool must hold at least one entry
    ZeroCapacity,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "Invalid argument: pool capacity must be at least 1"),
        }
    }
}

impl std::error::Error for PoolError {}

// ============================================================================
// Tests
// ============================================================================
