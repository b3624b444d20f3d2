//! Character bodies for wandering agents
//!
//! Both bodies treat the pose position as the agent's feet and report the
//! velocity left after sliding: a downward component is dropped once the
//! body stands on something.
//!
//! A grounded [`KinematicBody`] pushes a short probe into the floor every
//! move. The controller stops applying gravity once grounded, and without
//! the probe rapier would see no downward motion and stop reporting ground
//! contact.

use std::sync::Arc;

use glam::{Quat, Vec3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use super::world::{CollisionWorld, isometry};
use crate::agent::Body;
use crate::core::Transform;

/// Gap kept between the capsule and whatever it touches
const SKIN: f32 = 0.02;
/// Downward distance pushed into the floor while grounded
const GROUND_PROBE: f32 = 0.05;

/// Capsule-shaped body moved by rapier's kinematic character controller.
pub struct KinematicBody {
    world: Arc<CollisionWorld>,
    controller: KinematicCharacterController,
    shape: SharedShape,
    /// Distance from the feet to the capsule center, skin included
    center_height: f32,
    on_floor: bool,
}

impl KinematicBody {
    /// Create a capsule body; total height is `2 * (half_height + radius)`.
    pub fn capsule(world: Arc<CollisionWorld>, half_height: f32, radius: f32) -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(SKIN),
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(0.3),
                min_width: CharacterLength::Absolute(0.2),
                include_dynamic_bodies: false,
            }),
            ..Default::default()
        };

        Self {
            world,
            controller,
            shape: SharedShape::capsule_y(half_height, radius),
            center_height: half_height + radius + SKIN,
            on_floor: false,
        }
    }

    /// Human-sized capsule (1.8 units tall)
    pub fn humanoid(world: Arc<CollisionWorld>) -> Self {
        Self::capsule(world, 0.5, 0.4)
    }
}

impl Body for KinematicBody {
    fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    fn move_and_slide(&mut self, pose: &mut Transform, velocity: Vec3, delta_time: f32) -> Vec3 {
        let center = pose.position + Vec3::Y * self.center_height;
        let mut desired = velocity * delta_time;
        if self.on_floor && desired.y <= 0.0 {
            desired.y -= GROUND_PROBE;
        }

        let movement = self.controller.move_shape(
            delta_time,
            &self.world.rigid_body_set,
            &self.world.collider_set,
            &self.world.query_pipeline,
            &*self.shape,
            &isometry(center, Quat::IDENTITY),
            vector![desired.x, desired.y, desired.z],
            QueryFilter::default(),
            |_| {},
        );

        let moved = movement.translation;
        pose.translate(Vec3::new(moved.x, moved.y, moved.z));

        // Stopped short of the requested descent: something is underneath
        let blocked_below = desired.y < 0.0 && moved.y > desired.y + GROUND_PROBE * 0.5;
        self.on_floor = movement.grounded || blocked_below;

        settle(velocity, self.on_floor)
    }
}

impl std::fmt::Debug for KinematicBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinematicBody")
            .field("center_height", &self.center_height)
            .field("on_floor", &self.on_floor)
            .finish_non_exhaustive()
    }
}

/// Body over an infinite horizontal floor, with no other obstacles.
#[derive(Debug, Clone)]
pub struct FlatGround {
    height: f32,
    on_floor: bool,
}

impl FlatGround {
    /// Floor at `height`
    #[must_use]
    pub fn new(height: f32) -> Self {
        Self {
            height,
            on_floor: false,
        }
    }
}

impl Body for FlatGround {
    fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    fn move_and_slide(&mut self, pose: &mut Transform, velocity: Vec3, delta_time: f32) -> Vec3 {
        pose.translate(velocity * delta_time);

        self.on_floor = pose.position.y <= self.height;
        if self.on_floor {
            pose.position.y = self.height;
        }

        settle(velocity, self.on_floor)
    }
}

fn settle(mut velocity: Vec3, on_floor: bool) -> Vec3 {
    if on_floor && velocity.y < 0.0 {
        velocity.y = 0.0;
    }
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn fall(body: &mut dyn Body, pose: &mut Transform, steps: usize) -> Vec3 {
        let mut velocity = Vec3::ZERO;
        for _ in 0..steps {
            if !body.is_on_floor() {
                velocity.y -= 9.8 * DT;
            }
            velocity = body.move_and_slide(pose, velocity, DT);
        }
        velocity
    }

    #[test]
    fn test_flat_ground_lands() {
        let mut body = FlatGround::new(0.0);
        let mut pose = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));

        let velocity = fall(&mut body, &mut pose, 120);

        assert!(body.is_on_floor());
        assert_eq!(pose.position.y, 0.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_flat_ground_keeps_upward_velocity() {
        let mut body = FlatGround::new(0.0);
        let mut pose = Transform::new();

        let velocity = body.move_and_slide(&mut pose, Vec3::new(1.0, 2.0, 0.0), DT);

        assert!(!body.is_on_floor());
        assert_eq!(velocity, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_kinematic_body_lands_on_ground() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));

        let velocity = fall(&mut body, &mut pose, 180);

        assert!(body.is_on_floor());
        assert_eq!(velocity.y, 0.0);
        assert!(pose.position.y > -0.05 && pose.position.y < 0.15);
    }

    #[test]
    fn test_kinematic_body_stays_grounded_at_rest() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        fall(&mut body, &mut pose, 120);
        let rest = pose.position.y;

        for _ in 0..120 {
            let velocity = fall(&mut body, &mut pose, 1);
            assert!(body.is_on_floor());
            assert_eq!(velocity.y, 0.0);
            assert!((pose.position.y - rest).abs() < 0.02);
        }
    }

    #[test]
    fn test_kinematic_body_spawned_on_ground_does_not_sink() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::new();

        fall(&mut body, &mut pose, 360);

        assert!(body.is_on_floor());
        assert!(pose.position.y.abs() < 0.05);
    }

    #[test]
    fn test_kinematic_body_walks_off_ledge() {
        let mut world = CollisionWorld::new();
        // Platform top at y = 0 ending at x = 1
        world.add_box(Vec3::new(-4.0, -0.5, 0.0), Quat::IDENTITY, Vec3::new(5.0, 0.5, 5.0));
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::from_position(Vec3::new(0.0, 0.2, 0.0));
        fall(&mut body, &mut pose, 60);
        assert!(body.is_on_floor());

        for _ in 0..120 {
            body.move_and_slide(&mut pose, Vec3::new(3.0, 0.0, 0.0), DT);
        }

        assert!(pose.position.x > 2.0);
        assert!(!body.is_on_floor());
    }

    #[test]
    fn test_kinematic_body_walks_on_ground() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
        fall(&mut body, &mut pose, 120);

        for _ in 0..60 {
            body.move_and_slide(&mut pose, Vec3::new(1.5, 0.0, 0.0), DT);
        }

        assert!((pose.position.x - 1.5).abs() < 0.1);
        assert!(body.is_on_floor());
    }

    #[test]
    fn test_kinematic_body_is_blocked_by_wall() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);
        world.add_box(Vec3::new(2.0, 1.0, 0.0), Quat::IDENTITY, Vec3::new(0.5, 1.0, 5.0));
        let mut body = KinematicBody::humanoid(Arc::new(world));
        let mut pose = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
        fall(&mut body, &mut pose, 120);

        for _ in 0..240 {
            body.move_and_slide(&mut pose, Vec3::new(1.5, 0.0, 0.0), DT);
        }

        // Wall face at x = 1.5, capsule radius 0.4
        assert!(pose.position.x < 1.2);
    }
}
