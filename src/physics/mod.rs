//! Physics module
//!
//! Level collision geometry and character bodies built on rapier3d.

mod body;
mod world;

pub use body::{FlatGround, KinematicBody};
pub use world::{CollisionWorld, RaycastHit};
