//! Input handling module
//!
//! Host-supplied action and axis state; no device polling.

mod state;

pub use state::{Action, Input};
