//! Idle/wander behavior controller
//!
//! Alternates an agent between standing idle and walking to a random nearby
//! point. Each tick applies gravity, steers along the current path, turns the
//! model toward its direction of travel, picks the animation clip and hands
//! the resulting velocity to the body.
//!
//! # Example
//!
//! ```ignore
//! let mut npc = WanderController::builder(WanderConfig::default())
//!     .body(FlatGround::new(0.0))
//!     .path_follower(DirectPath::default())
//!     .animator(AnimationPlayer::new(library))
//!     .random(ChaCha8Rng::seed_from_u64(1))
//!     .build()?;
//!
//! loop {
//!     npc.tick(dt);
//! }
//! ```

use glam::Vec3;

use super::collaborators::{Animator, Body, PathFollower, RandomSource};
use super::config::{TimerPhase, WanderConfig};
use super::error::WanderError;
use crate::ai::{
    Countdown, EventQueue, Seek, SteeringBehavior, TransitionCause, WanderEvent, WanderState,
};
use crate::core::Transform;

/// Clip requested while idle
pub const IDLE_CLIP: &str = "Idle";
/// Clip requested while moving
pub const WALK_CLIP: &str = "Walk";
/// Crossfade time for every clip change
pub const ANIMATION_BLEND: f32 = 0.3;
/// Fraction of the remaining turn applied per tick (not time-normalized)
pub const TURN_BLEND: f32 = 0.1;
/// Squared speed above which the agent counts as moving
pub const MOVING_SPEED_SQ: f32 = 0.1;
/// Half extent of the square wander targets are drawn from
pub const WANDER_EXTENT: f32 = 10.0;

/// Controller for one wandering agent.
pub struct WanderController {
    config: WanderConfig,
    pose: Transform,
    velocity: Vec3,
    state: WanderState,
    timer: Countdown,
    target: Option<Vec3>,
    events: EventQueue,
    body: Box<dyn Body>,
    path: Box<dyn PathFollower>,
    animator: Box<dyn Animator>,
    random: Box<dyn RandomSource>,
}

impl WanderController {
    /// Start building a controller
    pub fn builder(config: WanderConfig) -> WanderControllerBuilder {
        WanderControllerBuilder::new(config)
    }

    /// Run one simulation frame.
    pub fn tick(&mut self, delta_time: f32) {
        if self.config.timer_phase == TimerPhase::BeforeMovement {
            self.advance_timer(delta_time);
        }

        self.update_movement(delta_time);

        if self.config.timer_phase == TimerPhase::AfterMovement {
            self.advance_timer(delta_time);
        }

        self.animator.advance(delta_time);
    }

    /// Timer expiry: switch state per the transition table.
    ///
    /// Called by `tick` when the countdown runs out; hosts that keep their
    /// own timers may call it directly instead.
    pub fn on_timeout(&mut self) {
        match self.state.on_timeout() {
            WanderState::Walking => {
                let target = Vec3::new(
                    self.random.range(-WANDER_EXTENT, WANDER_EXTENT),
                    0.0,
                    self.random.range(-WANDER_EXTENT, WANDER_EXTENT),
                );
                self.path.set_target(target);
                self.target = Some(target);
                self.events.push(WanderEvent::TargetChosen { target });

                self.state = WanderState::Walking;
                self.timer.start(self.config.walking_duration);
                self.record_entry(TransitionCause::Timeout);
            }
            WanderState::Idle => self.enter_idle(TransitionCause::Timeout),
        }
    }

    fn advance_timer(&mut self, delta_time: f32) {
        if self.timer.advance(delta_time) {
            self.on_timeout();
        }
    }

    fn update_movement(&mut self, delta_time: f32) {
        let mut velocity = self.velocity;

        if !self.body.is_on_floor() {
            velocity.y -= self.config.gravity * delta_time;
        }

        match self.state {
            WanderState::Walking => {
                if self.path.is_finished(self.pose.position) {
                    self.enter_idle(TransitionCause::PathFinished);
                    velocity.x = 0.0;
                    velocity.z = 0.0;
                } else {
                    velocity = self.move_toward_target(self.config.speed, velocity);
                }
            }
            WanderState::Idle => {
                self.animator.play(IDLE_CLIP, ANIMATION_BLEND);
                velocity.x = 0.0;
                velocity.z = 0.0;
            }
        }

        log::trace!(
            "{} at {} requesting velocity {velocity}",
            self.state,
            self.pose.position
        );
        self.velocity = self
            .body
            .move_and_slide(&mut self.pose, velocity, delta_time);
    }

    fn move_toward_target(&mut self, speed: f32, velocity: Vec3) -> Vec3 {
        let waypoint = self.path.next_waypoint(self.pose.position);
        let steering = Seek::new(waypoint, speed).calculate(self.pose.position, velocity);

        if steering.has_direction() {
            if let Some(facing) = self.config.forward_axis.facing(steering.direction) {
                self.pose.slerp_rotation(facing, TURN_BLEND);
            }
        }

        if steering.velocity.length_squared() > MOVING_SPEED_SQ {
            self.animator.play(WALK_CLIP, ANIMATION_BLEND);
        }

        steering.velocity
    }

    /// Shared by timeout and path completion.
    fn enter_idle(&mut self, cause: TransitionCause) {
        self.state = WanderState::Idle;
        self.timer.start(self.config.idle_duration);
        self.animator.play(IDLE_CLIP, ANIMATION_BLEND);
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
        self.record_entry(cause);
    }

    fn record_entry(&mut self, cause: TransitionCause) {
        let duration = self.timer.duration();
        log::debug!("Entered {} ({cause:?}) for {duration}s", self.state);
        self.events.push(WanderEvent::StateEntered {
            state: self.state,
            cause,
            duration,
        });
    }

    /// Current behavior state
    #[must_use]
    pub fn state(&self) -> WanderState {
        self.state
    }

    /// Agent pose
    #[must_use]
    pub fn pose(&self) -> &Transform {
        &self.pose
    }

    /// Velocity reported by the body after the last tick
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// The state countdown
    #[must_use]
    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    /// Last wander target. Stays set (stale) while idle.
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Configuration the controller was built with
    #[must_use]
    pub fn config(&self) -> &WanderConfig {
        &self.config
    }

    /// Take the events recorded since the last drain.
    ///
    /// Hosts should drain after every tick; an undrained queue keeps only
    /// the newest [`EventQueue::DEFAULT_LIMIT`] events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = WanderEvent> + '_ {
        self.events.drain()
    }

    /// Events recorded since the last drain
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }
}

impl std::fmt::Debug for WanderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WanderController")
            .field("state", &self.state)
            .field("pose", &self.pose)
            .field("velocity", &self.velocity)
            .field("timer", &self.timer)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Collects collaborators and validates them once, at setup.
pub struct WanderControllerBuilder {
    config: WanderConfig,
    pose: Transform,
    body: Option<Box<dyn Body>>,
    path: Option<Box<dyn PathFollower>>,
    animator: Option<Box<dyn Animator>>,
    random: Option<Box<dyn RandomSource>>,
}

impl WanderControllerBuilder {
    fn new(config: WanderConfig) -> Self {
        Self {
            config,
            pose: Transform::default(),
            body: None,
            path: None,
            animator: None,
            random: None,
        }
    }

    /// Initial pose
    pub fn pose(mut self, pose: Transform) -> Self {
        self.pose = pose;
        self
    }

    /// Grounded query and move effector
    pub fn body(mut self, body: impl Body + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Route provider
    pub fn path_follower(mut self, path: impl PathFollower + 'static) -> Self {
        self.path = Some(Box::new(path));
        self
    }

    /// Animation sink
    pub fn animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Source for wander targets
    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Validate and initialize: starts idle with the idle timer running.
    pub fn build(self) -> Result<WanderController, WanderError> {
        self.config.validate()?;

        let body = self.body.ok_or(WanderError::MissingCollaborator("body"))?;
        let path = self
            .path
            .ok_or(WanderError::MissingCollaborator("path follower"))?;
        let animator = self
            .animator
            .ok_or(WanderError::MissingCollaborator("animator"))?;
        let random = self
            .random
            .ok_or(WanderError::MissingCollaborator("random source"))?;

        let mut controller = WanderController {
            config: self.config,
            pose: self.pose,
            velocity: Vec3::ZERO,
            state: WanderState::Idle,
            timer: Countdown::new(),
            target: None,
            events: EventQueue::new(),
            body,
            path,
            animator,
            random,
        };
        controller.enter_idle(TransitionCause::Startup);

        Ok(controller)
    }
}

// ============================================================================
// Tests
// ============================================================================
