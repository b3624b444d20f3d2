//! Core module
//!
//! Poses, level description and the fixed-timestep simulation driver.

mod engine;
mod scene;
mod transform;

pub use engine::{SimConfig, SimReport, Simulation, TimedEvent};
pub use scene::{Obstacle, Scene};
pub use transform::Transform;
