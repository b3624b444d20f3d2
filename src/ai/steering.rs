//! Steering toward path waypoints
//!
//! Velocity and facing for an agent walking along a path.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Desired velocity for this tick
    pub velocity: Vec3,
    /// Unit direction of travel (zero when already at the target)
    pub direction: Vec3,
}

impl SteeringOutput {
    /// Check if there is a direction to face
    #[must_use]
    pub fn has_direction(&self) -> bool {
        self.direction.length() > 0.0
    }
}

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Calculate steering based on agent state
    fn calculate(&self, position: Vec3, velocity: Vec3) -> SteeringOutput;
}

/// Seek behavior - walk toward a waypoint at constant speed.
///
/// Only the horizontal components are driven; the vertical component of the
/// incoming velocity is carried through so gravity keeps accumulating.
#[derive(Debug, Clone)]
pub struct Seek {
    /// Waypoint position
    pub target: Vec3,
    /// Walking speed in units per second
    pub speed: f32,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: Vec3, speed: f32) -> Self {
        Self { target, speed }
    }
}

impl SteeringBehavior for Seek {
    fn calculate(&self, position: Vec3, velocity: Vec3) -> SteeringOutput {
        let direction = (self.target - position).normalize_or_zero();
        SteeringOutput {
            velocity: Vec3::new(
                direction.x * self.speed,
                velocity.y,
                direction.z * self.speed,
            ),
            direction,
        }
    }
}

/// Which local axis of the model's rest pose points "forward".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForwardAxis {
    /// Model faces +Z in its rest pose
    #[default]
    PositiveZ,
    /// Model faces -Z in its rest pose
    NegativeZ,
}

impl ForwardAxis {
    /// The axis in local space
    #[must_use]
    pub const fn local(self) -> Vec3 {
        match self {
            Self::PositiveZ => Vec3::Z,
            Self::NegativeZ => Vec3::NEG_Z,
        }
    }

    /// Rotation that points this axis along `direction`, keeping +Y up.
    ///
    /// Returns `None` when `direction` is zero or parallel to up.
    #[must_use]
    pub fn facing(self, direction: Vec3) -> Option<Quat> {
        let forward = direction.try_normalize()?;
        let z = match self {
            Self::PositiveZ => forward,
            Self::NegativeZ => -forward,
        };
        let x = Vec3::Y.cross(z).try_normalize()?;
        let y = z.cross(x);

        Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
    }
}
