//! Wander controller configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::WanderError;
use crate::ai::ForwardAxis;

/// When the countdown is processed relative to the movement update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerPhase {
    /// Timer first: a state entered on expiry drives this tick's velocity.
    BeforeMovement,
    /// Movement first: a state entered on expiry shows from the next tick.
    #[default]
    AfterMovement,
}

/// Tunable parameters of a wandering agent.
///
/// Missing fields in a RON file fall back to the defaults:
///
/// ```ron
/// (
///     speed: 2.0,
///     idle_duration: 3.0,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Walking speed in units per second
    pub speed: f32,
    /// Seconds spent walking before giving up on the target
    pub walking_duration: f32,
    /// Seconds spent idle before picking a new target
    pub idle_duration: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Forward axis of the model's rest pose
    pub forward_axis: ForwardAxis,
    /// Ordering of the countdown within a tick
    pub timer_phase: TimerPhase,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            walking_duration: 5.0,
            idle_duration: 5.0,
            gravity: 9.8,
            forward_axis: ForwardAxis::PositiveZ,
            timer_phase: TimerPhase::AfterMovement,
        }
    }
}

impl WanderConfig {
    /// Set walking speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set both state durations
    pub fn with_durations(mut self, idle: f32, walking: f32) -> Self {
        self.idle_duration = idle;
        self.walking_duration = walking;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the model's forward axis
    pub fn with_forward_axis(mut self, axis: ForwardAxis) -> Self {
        self.forward_axis = axis;
        self
    }

    /// Set timer ordering
    pub fn with_timer_phase(mut self, phase: TimerPhase) -> Self {
        self.timer_phase = phase;
        self
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, WanderError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WanderError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&source)?;
        log::info!("Loaded wander config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), WanderError> {
        let invalid = |field, reason| Err(WanderError::InvalidConfig { field, reason });

        if !self.speed.is_finite() || self.speed < 0.0 {
            return invalid("speed", "must be finite and non-negative");
        }
        if !self.walking_duration.is_finite() || self.walking_duration <= 0.0 {
            return invalid("walking_duration", "must be finite and positive");
        }
        if !self.idle_duration.is_finite() || self.idle_duration <= 0.0 {
            return invalid("idle_duration", "must be finite and positive");
        }
        if !self.gravity.is_finite() {
            return invalid("gravity", "must be finite");
        }

        Ok(())
    }
}
