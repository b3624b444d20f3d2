//! Level description and agent wiring
//!
//! A scene lists the static geometry and clips an agent needs. It can be
//! written in RON (Rusty Object Notation) and turns into a fully wired
//! [`WanderController`].

use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::agent::{WANDER_EXTENT, WanderConfig, WanderController, WanderError};
use crate::ai::{Grid, GridPath, NavigationSettings};
use crate::animation::{AnimationClip, AnimationLibrary, AnimationPlayer};
use crate::physics::{CollisionWorld, KinematicBody};

/// Axis-aligned box standing on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Center of the box
    pub center: Vec3,
    /// Half size along each axis
    pub half_extents: Vec3,
}

impl Obstacle {
    /// Create an obstacle
    #[must_use]
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }
}

/// Everything needed to drop a wandering agent into a level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Height of the walkable ground
    pub ground_height: f32,
    /// Where the agent's feet start
    pub spawn: Vec3,
    /// Static boxes
    pub obstacles: Vec<Obstacle>,
    /// Navigation grid cell size
    pub cell_size: f32,
    /// Obstacles grow by this much on the navigation grid
    pub agent_radius: f32,
    /// Navigation arrival thresholds
    pub navigation: NavigationSettings,
    /// Clips the agent can play
    pub clips: AnimationLibrary,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            spawn: Vec3::ZERO,
            obstacles: vec![
                Obstacle::new(Vec3::new(4.0, 0.5, 0.0), Vec3::new(0.5, 0.5, 3.0)),
                Obstacle::new(Vec3::new(-5.0, 1.0, -5.0), Vec3::new(1.5, 1.0, 1.5)),
            ],
            cell_size: 0.5,
            agent_radius: 0.4,
            navigation: NavigationSettings::default(),
            clips: AnimationLibrary::new()
                .with_clip(AnimationClip::new("Idle", 2.0))
                .with_clip(AnimationClip::new("Walk", 1.0)),
        }
    }
}

impl Scene {
    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, WanderError> {
        let scene: Self = ron::from_str(source)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WanderError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Check that the level can be built
    pub fn validate(&self) -> Result<(), WanderError> {
        let invalid = |field, reason| Err(WanderError::InvalidConfig { field, reason });

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return invalid("cell_size", "must be finite and positive");
        }
        if !self.agent_radius.is_finite() || self.agent_radius < 0.0 {
            return invalid("agent_radius", "must be finite and non-negative");
        }
        if !self.ground_height.is_finite() || !self.spawn.is_finite() {
            return invalid("spawn", "must be finite");
        }
        let bad_obstacle = self.obstacles.iter().any(|o| {
            !o.center.is_finite()
                || !o.half_extents.is_finite()
                || o.half_extents.min_element() <= 0.0
        });
        if bad_obstacle {
            return invalid("obstacles", "need finite centers and positive half extents");
        }

        Ok(())
    }

    /// Build the collision world for this level
    #[must_use]
    pub fn collision_world(&self) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(self.ground_height);
        for obstacle in &self.obstacles {
            world.add_box(obstacle.center, Quat::IDENTITY, obstacle.half_extents);
        }
        world
    }

    /// Build a navigation grid covering the wander area plus a margin
    #[must_use]
    pub fn navigation_grid(&self) -> Grid {
        let extent = WANDER_EXTENT + 1.0;
        let mut grid = Grid::covering(Vec2::splat(-extent), Vec2::splat(extent), self.cell_size);

        for obstacle in &self.obstacles {
            let center = Vec2::new(obstacle.center.x, obstacle.center.z);
            let half = Vec2::new(obstacle.half_extents.x, obstacle.half_extents.z)
                + self.agent_radius;
            grid.block_rect(center - half, center + half);
        }
        grid
    }

    /// Wire a controller with a kinematic body, grid path follower,
    /// animation player and a seeded random source.
    pub fn spawn_wanderer(
        &self,
        config: WanderConfig,
        seed: u64,
    ) -> Result<WanderController, WanderError> {
        self.validate()?;
        let world = Arc::new(self.collision_world());
        let path = GridPath::new(self.navigation_grid(), self.ground_height, self.navigation);

        log::info!(
            "Spawning wanderer at {} among {} obstacles",
            self.spawn,
            self.obstacles.len()
        );

        WanderController::builder(config)
            .pose(Transform::from_position(self.spawn))
            .body(KinematicBody::humanoid(world))
            .path_follower(path)
            .animator(AnimationPlayer::new(self.clips.clone()))
            .random(ChaCha8Rng::seed_from_u64(seed))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_geometry() {
        let scene = Scene::default();
        let world = scene.collision_world();

        // Ground plus two boxes
        assert_eq!(world.collider_count(), 3);
    }

    #[test]
    fn test_navigation_grid_blocks_obstacles() {
        let scene = Scene::default();
        let grid = scene.navigation_grid();

        let blocked = grid.cell_at(Vec2::new(4.0, 0.0)).unwrap();
        assert!(!grid.is_walkable(blocked.0, blocked.1));

        let open = grid.cell_at(Vec2::new(0.0, 0.0)).unwrap();
        assert!(grid.is_walkable(open.0, open.1));
    }

    #[test]
    fn test_scene_from_ron() {
        let scene = Scene::from_ron_str(
            r#"(
                spawn: (1.0, 0.0, 2.0),
                obstacles: [],
                clips: [(name: "Idle", duration: 1.0), (name: "Walk", duration: 0.8)],
            )"#,
        )
        .unwrap();

        assert_eq!(scene.spawn, Vec3::new(1.0, 0.0, 2.0));
        assert!(scene.obstacles.is_empty());
        assert_eq!(scene.cell_size, 0.5);
        assert!(scene.clips.contains("Walk"));
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let err = Scene::from_ron_str("(cell_size: 0.0)").unwrap_err();
        assert!(matches!(err, WanderError::InvalidConfig { field: "cell_size", .. }));

        let scene = Scene {
            cell_size: 0.0,
            ..Scene::default()
        };
        assert!(matches!(
            scene.spawn_wanderer(WanderConfig::default(), 0),
            Err(WanderError::InvalidConfig { field: "cell_size", .. })
        ));
    }

    #[test]
    fn test_negative_agent_radius_rejected() {
        let err = Scene::from_ron_str("(agent_radius: -0.5)").unwrap_err();
        assert!(matches!(err, WanderError::InvalidConfig { field: "agent_radius", .. }));
    }

    #[test]
    fn test_flat_obstacle_rejected() {
        let err = Scene::from_ron_str(
            "(obstacles: [(center: (0.0, 0.0, 0.0), half_extents: (1.0, 0.0, 1.0))])",
        )
        .unwrap_err();
        assert!(matches!(err, WanderError::InvalidConfig { field: "obstacles", .. }));
    }

    #[test]
    fn test_spawn_wanderer() {
        let controller = Scene::default()
            .spawn_wanderer(WanderConfig::default(), 3)
            .unwrap();

        assert_eq!(controller.pose().position, Vec3::ZERO);
        assert!(controller.timer().is_running());
    }
}
