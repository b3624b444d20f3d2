//! AI and navigation module
//!
//! Provides the wander state machine, steering toward waypoints, grid
//! pathfinding and path followers.

mod events;
mod fsm;
mod pathfinding;
mod steering;

pub use events::{EventQueue, TransitionCause, WanderEvent};
pub use fsm::{Countdown, WanderState};
pub use pathfinding::{DirectPath, Grid, GridPath, NavigationSettings, PathResult, find_path};
pub use steering::{ForwardAxis, Seek, SteeringBehavior, SteeringOutput};
