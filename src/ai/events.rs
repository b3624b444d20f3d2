//! Behavior events
//!
//! The controller records what happened during a tick so the host (UI,
//! audio, debugging overlays) can react without polling controller state.
//! Events accumulate until the host drains them; an undrained queue keeps
//! only the most recent [`EventQueue::DEFAULT_LIMIT`] events.
//!
//! # Example
//!
//! ```ignore
//! controller.tick(dt);
//! for event in controller.drain_events() {
//!     if let WanderEvent::TargetChosen { target } = event {
//!         log::info!("heading to {target}");
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use super::fsm::WanderState;

/// Why a state was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// Controller construction
    Startup,
    /// The countdown ran out
    Timeout,
    /// The path follower reported the route as finished
    PathFinished,
}

/// Something the wander behavior did.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum WanderEvent {
    /// A state was entered and its timer started.
    StateEntered {
        /// The new state
        state: WanderState,
        /// What triggered the transition
        cause: TransitionCause,
        /// Duration the timer was restarted with
        duration: f32,
    },

    /// A new wander target was handed to the path follower.
    TargetChosen {
        /// Destination in world space
        target: Vec3,
    },
}

/// Bounded FIFO of events waiting for the host.
///
/// When full, recording a new event drops the oldest one.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<WanderEvent>,
    limit: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl EventQueue {
    /// Events kept by a queue nobody drains
    pub const DEFAULT_LIMIT: usize = 256;

    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue holding at most `limit` events (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record an event, dropping the oldest if the queue is full.
    pub fn push(&mut self, event: WanderEvent) {
        if self.events.len() >= self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Maximum number of events kept
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Iterate over recorded events without consuming them.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &WanderEvent> {
        self.events.iter()
    }

    /// Take all recorded events, oldest first.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = WanderEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if nothing is recorded.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of recorded events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(WanderEvent::TargetChosen { target: Vec3::X });
        queue.push(WanderEvent::StateEntered {
            state: WanderState::Walking,
            cause: TransitionCause::Timeout,
            duration: 5.0,
        });

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], WanderEvent::TargetChosen { .. }));
        assert!(matches!(
            events[1],
            WanderEvent::StateEntered {
                state: WanderState::Walking,
                ..
            }
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut queue = EventQueue::with_limit(3);
        for i in 0..5 {
            queue.push(WanderEvent::TargetChosen {
                target: Vec3::splat(i as f32),
            });
        }

        assert_eq!(queue.len(), 3);
        let targets: Vec<_> = queue
            .drain()
            .map(|e| match e {
                WanderEvent::TargetChosen { target } => target.x,
                _ => -1.0,
            })
            .collect();
        assert_eq!(targets, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(EventQueue::new().limit(), EventQueue::DEFAULT_LIMIT);
        assert_eq!(EventQueue::with_limit(0).limit(), 1);
    }

    #[test]
    fn test_iter_does_not_consume() {
        let mut queue = EventQueue::new();
        queue.push(WanderEvent::TargetChosen { target: Vec3::Z });

        assert_eq!(queue.iter().count(), 1);
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
    }
}
