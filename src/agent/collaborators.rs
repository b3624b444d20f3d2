//! Interfaces the wander controller drives
//!
//! Pathfinding, animation and collision resolution belong to the host; the
//! controller only talks to them through these traits.

use glam::Vec3;
use rand::Rng;

use crate::core::Transform;

/// Physical body of the agent: grounded query plus move effector.
pub trait Body {
    /// Whether the body rests on a walkable surface.
    fn is_on_floor(&self) -> bool;

    /// Move `pose` by `velocity` for one tick, resolving collisions.
    ///
    /// Returns the velocity after sliding (e.g. with the downward component
    /// removed once the body lands).
    fn move_and_slide(&mut self, pose: &mut Transform, velocity: Vec3, delta_time: f32) -> Vec3;
}

/// Route provider toward a destination.
pub trait PathFollower {
    /// Set a new destination, discarding any current route.
    fn set_target(&mut self, target: Vec3);

    /// Whether the route to the destination is complete.
    fn is_finished(&mut self, position: Vec3) -> bool;

    /// Next intermediate point toward the destination.
    ///
    /// Returns `position` itself when there is nowhere to go.
    fn next_waypoint(&mut self, position: Vec3) -> Vec3;
}

/// Animation playback sink.
pub trait Animator {
    /// Crossfade to `clip` over `blend` seconds.
    ///
    /// Requesting the clip that is already playing must not restart it.
    fn play(&mut self, clip: &str, blend: f32);

    /// Advance playback by one tick.
    fn advance(&mut self, _delta_time: f32) {}
}

/// Uniform random sampling.
pub trait RandomSource {
    /// Sample uniformly from the closed range `[min, max]`.
    fn range(&mut self, min: f32, max: f32) -> f32;
}

impl<R: Rng> RandomSource for R {
    fn range(&mut self, min: f32, max: f32) -> f32 {
        self.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rng_range_is_closed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.range(-10.0, 10.0);
            assert!((-10.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn test_rng_degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(rng.range(3.0, 3.0), 3.0);
    }
}
