//! Event Queue for Decoupled Communication
//!
//! Gameplay systems push [`GameEvent`]s while they update; consumers (the
//! binary's summary, UI or audio in a host) read them the next frame. The
//! queue is double-buffered so the order systems update in never changes
//! what a reader sees.
//!
//! # Example
//!
//! ```ignore
//! ctx.events.push(GameEvent::FlameHit { obstacle: handle, damage: 1.0 });
//!
//! for event in ctx.events.iter() {
//!     if let GameEvent::Health(HealthEvent::FullyDepleted { .. }) = event {
//!         ctx.should_quit = true;
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use crate::effects::{EmissionPhase, MashingOutcome};
use crate::gameplay::HealthEvent;
use crate::pool::PoolHandle;

// ============================================================================
// Event Types
// ============================================================================

/// Something that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Pool Events
    // -------------------------------------------------------------------------
    /// An obstacle was recycled into place.
    ObstacleSpawned {
        /// Handle of the obstacle
        handle: PoolHandle,
        /// Spawn position
        position: Vec3,
    },

    /// A pit segment was recycled into place.
    PitSpawned {
        /// Handle of the pit segment
        handle: PoolHandle,
        /// Spawn position
        position: Vec3,
    },

    /// A pooled entity was returned to its pool.
    EntityReleased {
        /// Handle that was released
        handle: PoolHandle,
    },

    // -------------------------------------------------------------------------
    // Flame Events
    // -------------------------------------------------------------------------
    /// The flame touched an obstacle.
    FlameHit {
        /// Obstacle that was hit
        obstacle: PoolHandle,
        /// Damage applied to the flame
        damage: f32,
    },

    /// The light emission entered a new phase.
    EmissionPhaseChanged {
        /// New phase
        phase: EmissionPhase,
    },

    /// The flame's health changed.
    Health(HealthEvent),

    // -------------------------------------------------------------------------
    // Session Events
    // -------------------------------------------------------------------------
    /// The opening mashing sequence finished.
    MashingFinished {
        /// How it ended
        outcome: MashingOutcome,
    },

    /// Session state transition.
    StateChanged {
        /// New state name
        state: &'static str,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
///
/// Events pushed during frame N are available for reading during frame N+1.
///
/// # Performance
///
/// - Push: O(1) amortized
/// - Iteration: O(n)
/// - Swap: O(1)
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from previous frame, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next frame.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Called once per frame by the engine before the game updates.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Iterate over events pushed this frame, not yet swapped in.
    #[inline]
    pub fn iter_pending(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Drain all events from the previous frame.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next frame.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_push_and_swap() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::StateChanged { state: "running" });
        assert!(queue.is_empty(), "Events should not be visible before swap");
        assert_eq!(queue.pending_count(), 1);

        queue.swap();
        assert_eq!(queue.len(), 1);

        let events: Vec<_> = queue.iter().collect();
        assert!(matches!(events[0], GameEvent::StateChanged { state: "running" }));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::EmissionPhaseChanged {
            phase: EmissionPhase::RampingUp,
        });
        queue.swap();

        queue.push(GameEvent::EmissionPhaseChanged {
            phase: EmissionPhase::Holding,
        });

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(
            events,
            vec![&GameEvent::EmissionPhaseChanged {
                phase: EmissionPhase::RampingUp
            }]
        );

        queue.swap();
        let events: Vec<_> = queue.iter().collect();
        assert_eq!(
            events,
            vec![&GameEvent::EmissionPhaseChanged {
                phase: EmissionPhase::Holding
            }]
        );
    }

    #[test]
    fn test_event_queue_drain() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::MashingFinished {
            outcome: MashingOutcome::Succeeded,
        });
        queue.push(GameEvent::StateChanged { state: "running" });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_queue_clear() {
        let mut queue = EventQueue::new();

        queue.push(GameEvent::StateChanged { state: "a" });
        queue.swap();
        queue.push(GameEvent::StateChanged { state: "b" });

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_health_event_wrapped() {
        let event = GameEvent::Health(HealthEvent::Depleted { amount: 2.0 });

        if let GameEvent::Health(HealthEvent::Depleted { amount }) = event {
            assert!((amount - 2.0).abs() < f32::EPSILON);
        } else {
            panic!("Wrong event type");
        }
    }
}
