//! Animation module
//!
//! Named clips and a crossfading player that the wander controller drives.

mod clip;
mod player;

pub use clip::{AnimationClip, AnimationLibrary};
pub use player::{AnimationPlayer, PlaybackState};
