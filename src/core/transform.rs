//! Agent pose

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of an agent in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space (the agent's feet)
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Rotate a local-space axis into world space
    pub fn rotate_axis(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Blend the rotation toward `target` by a fixed fraction.
    ///
    /// The current rotation is renormalized first so accumulated drift never
    /// reaches the interpolation.
    pub fn slerp_rotation(&mut self, target: Quat, t: f32) {
        self.rotation = self.rotation.normalize().slerp(target, t);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
