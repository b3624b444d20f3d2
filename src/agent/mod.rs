//! Wandering agent
//!
//! The idle/wander controller, its configuration and the collaborator
//! interfaces it drives.

mod collaborators;
mod config;
mod controller;
mod error;

pub use collaborators::{Animator, Body, PathFollower, RandomSource};
pub use config::{TimerPhase, WanderConfig};
pub use controller::{
    ANIMATION_BLEND, IDLE_CLIP, MOVING_SPEED_SQ, TURN_BLEND, WALK_CLIP, WANDER_EXTENT,
    WanderController, WanderControllerBuilder,
};
pub use error::WanderError;
