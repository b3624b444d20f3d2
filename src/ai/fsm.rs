//! Wander/idle state machine primitives
//!
//! The wander behavior has exactly two states and a single countdown that
//! decides when to leave them. Both live here so the controller only has to
//! wire them to its collaborators.
//!
//! # Transition table
//!
//! | State   | On timeout                  | Timer restarted with |
//! |---------|-----------------------------|----------------------|
//! | Idle    | pick target, go Walking     | `walking_duration`   |
//! | Walking | play Idle, go Idle          | `idle_duration`      |
//!
//! Path completion is the only other way out of Walking.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Wander State
// ============================================================================

/// Behavior state of a wandering agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WanderState {
    /// Standing still, waiting for the timer.
    #[default]
    Idle,
    /// Following a path toward the wander target.
    Walking,
}

impl WanderState {
    /// State name for debugging and logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walking => "Walking",
        }
    }

    /// The state a timer expiry moves to.
    #[must_use]
    pub const fn on_timeout(self) -> Self {
        match self {
            Self::Idle => Self::Walking,
            Self::Walking => Self::Idle,
        }
    }
}

impl fmt::Display for WanderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Countdown
// ============================================================================

/// Non-repeating countdown timer.
///
/// `advance` reports expiry exactly once; afterwards the countdown stays
/// stopped until `start` is called again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Countdown {
    /// Duration the countdown was last started with
    duration: f32,
    /// Seconds left before expiry
    remaining: f32,
    /// Whether the countdown is ticking
    running: bool,
}

impl Countdown {
    /// Create a stopped countdown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the countdown. A running countdown is superseded.
    pub fn start(&mut self, duration: f32) {
        self.duration = duration;
        self.remaining = duration;
        self.running = true;
    }

    /// Stop without firing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `delta_time` seconds.
    ///
    /// Returns `true` on the call that crosses zero.
    pub fn advance(&mut self, delta_time: f32) -> bool {
        if !self.running {
            return false;
        }

        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }

        false
    }

    /// Duration of the current (or last) run.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Check if the countdown is ticking.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

// ============================================================================
// Tests
// ============================================================================
