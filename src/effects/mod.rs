//! Timed gameplay sequences driven frame by frame
//!
//! - [`fsm`] - enter/update/exit state machine
//! - [`LightEmission`] - light pulse with cooldown
//! - [`ButtonMashing`] - press-to-fill sequence with a final outcome

pub mod fsm;

mod emission;
mod mashing;

pub use emission::{EmissionConfig, EmissionPhase, LightEmission, SequenceError};
pub use mashing::{ButtonMashing, MashingConfig, MashingOutcome, OutcomeCallback};
