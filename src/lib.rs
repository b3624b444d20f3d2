//! Idle/wander behavior for non-player characters
//!
//! This crate provides:
//! - A two-state idle/walk controller driven by countdown timers
//! - Grid A* navigation and straight-line path following
//! - Animation playback with crossfades
//! - Kinematic character bodies with rapier3d

pub mod agent;
pub mod ai;
pub mod animation;
pub mod core;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{
        Animator, Body, PathFollower, RandomSource, TimerPhase, WanderConfig, WanderController,
        WanderError,
    };
    pub use crate::ai::{DirectPath, ForwardAxis, GridPath, WanderEvent, WanderState};
    pub use crate::animation::{AnimationClip, AnimationLibrary, AnimationPlayer};
    pub use crate::core::{Scene, SimConfig, SimReport, Simulation, Transform};
    pub use crate::physics::{CollisionWorld, FlatGround, KinematicBody};
    pub use glam::{Quat, Vec2, Vec3};
}
