//! Static level geometry using rapier3d

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Convert glam Quat to rapier3d UnitQuaternion
pub(crate) fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert a glam position and rotation to a rapier isometry
pub(crate) fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

/// Collision world holding the level's fixed colliders.
///
/// Characters query it read-only, so it can be shared between agents
/// behind an `Arc` once built.
pub struct CollisionWorld {
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pub(crate) query_pipeline: QueryPipeline,
    integration_parameters: IntegrationParameters,
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Add a ground slab whose top surface lies at `height`
    pub fn add_ground_plane(&mut self, height: f32) -> ColliderHandle {
        let half_thickness = 0.1;
        self.add_box(
            Vec3::new(0.0, height - half_thickness, 0.0),
            Quat::IDENTITY,
            Vec3::new(100.0, half_thickness, 100.0),
        )
    }

    /// Add a fixed box (walls, crates, steps)
    pub fn add_box(&mut self, center: Vec3, rotation: Quat, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(isometry(center, rotation))
            .build();
        let handle = self.collider_set.insert(collider);
        self.refresh();
        handle
    }

    /// Number of colliders
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Cast a ray and return the first hit
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map(|(collider, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider,
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }

    /// Step once so the query pipeline sees new colliders (nothing here moves)
    fn refresh(&mut self) {
        self.pipeline.step(
            &vector![0.0, 0.0, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollisionWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionWorld")
            .field("colliders", &self.collider_set.len())
            .finish_non_exhaustive()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_plane_is_hit_from_above() {
        let mut world = CollisionWorld::new();
        world.add_ground_plane(0.0);

        let hit = world.raycast(Vec3::new(1.0, 5.0, -2.0), Vec3::NEG_Y, 10.0).unwrap();

        assert!((hit.distance - 5.0).abs() < 1e-3);
        assert!(hit.point.y.abs() < 1e-3);
    }

    #[test]
    fn test_box_blocks_ray() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(5.0, 1.0, 0.0), Quat::IDENTITY, Vec3::splat(1.0));

        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 20.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-3);

        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_X, 20.0).is_none());
        assert_eq!(world.collider_count(), 1);
    }
}
