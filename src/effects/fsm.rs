//! Finite State Machine for Timed Sequences
//!
//! Timed effects (light emission, intro sequences) are written as a set of
//! states with enter/update/exit hooks and advanced once per frame by the
//! host, instead of suspending and resuming a coroutine.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug)]
//! struct Waiting { left: f32 }
//!
//! impl State<Clock> for Waiting {
//!     fn name(&self) -> &'static str { "Waiting" }
//!
//!     fn update(&mut self, ctx: &mut Clock) -> Transition<Clock> {
//!         self.left -= ctx.delta_time;
//!         if self.left <= 0.0 { Transition::to(Done) } else { Transition::None }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new(Waiting { left: 1.0 });
//! fsm.update(&mut clock);
//! ```

use std::fmt;

// ============================================================================
// State Trait
// ============================================================================

/// One state of a sequence.
///
/// 1. `enter()` - once, when the state becomes current
/// 2. `update()` - every frame while current
/// 3. `exit()` - once, when another state replaces it
pub trait State<Ctx>: fmt::Debug {
    /// State name for logging.
    fn name(&self) -> &'static str;

    /// Called when entering this state.
    fn enter(&mut self, _ctx: &mut Ctx) {}

    /// Called each frame while in this state.
    fn update(&mut self, ctx: &mut Ctx) -> Transition<Ctx>;

    /// Called when exiting this state.
    fn exit(&mut self, _ctx: &mut Ctx) {}
}

// ============================================================================
// Transition
// ============================================================================

/// Decision returned from [`State::update`].
pub enum Transition<Ctx> {
    /// Stay in the current state.
    None,
    /// Replace the current state.
    To(Box<dyn State<Ctx>>),
}

impl<Ctx> Transition<Ctx> {
    /// Create a transition to a new state.
    pub fn to<S: State<Ctx> + 'static>(state: S) -> Self {
        Transition::To(Box::new(state))
    }
}

impl<Ctx> fmt::Debug for Transition<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "Transition::None"),
            Transition::To(state) => write!(f, "Transition::To({})", state.name()),
        }
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// Owns the current state and drives its lifecycle.
pub struct StateMachine<Ctx> {
    current: Box<dyn State<Ctx>>,
    /// Whether `enter()` has run for `current`
    entered: bool,
}

impl<Ctx> StateMachine<Ctx> {
    /// Create a machine. The initial state is entered on the first `update()`.
    pub fn new<S: State<Ctx> + 'static>(initial: S) -> Self {
        Self {
            current: Box::new(initial),
            entered: false,
        }
    }

    /// Advance the current state by one frame.
    ///
    /// Returns the name of the newly entered state when a transition happened.
    pub fn update(&mut self, ctx: &mut Ctx) -> Option<&'static str> {
        if !self.entered {
            self.current.enter(ctx);
            self.entered = true;
        }

        match self.current.update(ctx) {
            Transition::None => None,
            Transition::To(next) => {
                self.replace(ctx, next);
                Some(self.current.name())
            }
        }
    }

    /// Immediately switch to `state`, running exit and enter hooks.
    pub fn transition<S: State<Ctx> + 'static>(&mut self, ctx: &mut Ctx, state: S) {
        self.replace(ctx, Box::new(state));
    }

    fn replace(&mut self, ctx: &mut Ctx, mut next: Box<dyn State<Ctx>>) {
        if self.entered {
            self.current.exit(ctx);
        }

        log::trace!("State {} -> {}", self.current.name(), next.name());
        next.enter(ctx);
        self.current = next;
        self.entered = true;
    }

    /// Get the name of the current state.
    #[must_use]
    pub fn current_state_name(&self) -> &'static str {
        self.current.name()
    }

    /// Check if the machine is in the state with the given name.
    #[must_use]
    pub fn is_in_state(&self, name: &str) -> bool {
        self.current.name() == name
    }
}

impl<Ctx> fmt::Debug for StateMachine<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.name())
            .field("entered", &self.entered)
            .finish()
    }
}
