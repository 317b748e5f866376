//! Frame-driven timers
//!
//! Timers in this module are advanced by explicit `tick(delta)` calls from
//! the host loop instead of being scheduled by a runtime.

mod cooldown;

pub use cooldown::{Cooldown, CooldownCallback, CooldownError};
