//! Per-frame input supplied by the host

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game actions the host can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Mashing button during the opening sequence
    Mash,
    /// Start a light emission pulse
    EmitLight,
}

/// Input state manager
///
/// The host writes movement axes and action presses before each frame; the
/// engine clears the per-frame part after the game has updated.
#[derive(Debug, Default)]
pub struct Input {
    /// Currently held actions
    held: HashSet<Action>,
    /// Actions pressed this frame
    just_pressed: HashSet<Action>,
    /// Actions released this frame
    just_released: HashSet<Action>,
    /// Movement axes, each in `[-1, 1]`
    axes: Vec2,
}

impl Input {
    /// Create an input manager with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Held actions and axes persist.
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Press an action
    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Release an action
    pub fn release(&mut self, action: Action) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Press and immediately release, as a single tap within one frame
    pub fn tap(&mut self, action: Action) {
        self.press(action);
        self.release(action);
    }

    /// Set the movement axes, clamped to `[-1, 1]`
    pub fn set_axes(&mut self, axes: Vec2) {
        self.axes = axes.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Current movement axes
    pub fn axes(&self) -> Vec2 {
        self.axes
    }

    /// Check if an action is held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was pressed this frame
    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was released this frame
    pub fn is_just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }
}
