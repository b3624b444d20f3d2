//! Animation playback control
//!
//! Provides an animation player with named clips and crossfades.

use rustc_hash::FxHashSet;

use super::clip::{AnimationClip, AnimationLibrary};
use crate::agent::Animator;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Animation is playing
    Playing,
    /// Animation is paused
    Paused,
    /// Animation has stopped (or a one-shot clip reached its end)
    #[default]
    Stopped,
}

/// A clip being sampled and its local time
#[derive(Debug, Clone)]
struct Track {
    clip: AnimationClip,
    time: f32,
}

impl Track {
    fn new(clip: AnimationClip) -> Self {
        Self { clip, time: 0.0 }
    }

    /// Advance local time; returns `false` once a one-shot clip has ended.
    fn advance(&mut self, delta_time: f32) -> bool {
        if self.clip.duration <= 0.0 {
            self.time = 0.0;
            return self.clip.looping;
        }

        self.time += delta_time;
        if self.time < self.clip.duration {
            return true;
        }

        if self.clip.looping {
            self.time %= self.clip.duration;
            true
        } else {
            self.time = self.clip.duration;
            false
        }
    }
}

/// Animation player with crossfading between named clips
#[derive(Debug)]
pub struct AnimationPlayer {
    /// Clips that can be played
    library: AnimationLibrary,
    /// Clip fading in (or fully playing)
    current: Option<Track>,
    /// Clip fading out
    previous: Option<Track>,
    /// Length of the active crossfade
    blend_time: f32,
    /// Time spent in the active crossfade
    blend_elapsed: f32,
    /// Playback speed multiplier
    speed: f32,
    /// Current playback state
    state: PlaybackState,
    /// Number of times a clip was (re)started
    starts: u32,
    /// Unknown clip names already reported
    missing: FxHashSet<String>,
}

impl AnimationPlayer {
    /// Create a player over a clip library
    #[must_use]
    pub fn new(library: AnimationLibrary) -> Self {
        Self {
            library,
            current: None,
            previous: None,
            blend_time: 0.0,
            blend_elapsed: 0.0,
            speed: 1.0,
            state: PlaybackState::Stopped,
            starts: 0,
            missing: FxHashSet::default(),
        }
    }

    /// Crossfade to `name` over `blend` seconds.
    ///
    /// No-op if `name` is already playing. Unknown clips are ignored and
    /// reported once per name.
    pub fn play(&mut self, name: &str, blend: f32) {
        if self.state == PlaybackState::Playing && self.current_clip() == Some(name) {
            return;
        }

        let Some(clip) = self.library.get(name).cloned() else {
            if self.missing.insert(name.to_string()) {
                log::warn!("Animation clip '{name}' not found");
            }
            return;
        };

        log::debug!("Playing '{name}' (blend {blend}s)");
        self.previous = if blend > 0.0 { self.current.take() } else { None };
        self.current = Some(Track::new(clip));
        self.blend_time = blend.max(0.0);
        self.blend_elapsed = 0.0;
        self.state = PlaybackState::Playing;
        self.starts += 1;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Resume paused playback
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback and drop both tracks
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.current = None;
        self.previous = None;
    }

    /// Update playback (call each frame)
    pub fn update(&mut self, delta_time: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let delta_time = delta_time * self.speed;

        if let Some(previous) = &mut self.previous {
            previous.advance(delta_time);
        }
        self.blend_elapsed += delta_time;
        if self.blend_elapsed >= self.blend_time {
            self.previous = None;
        }

        if let Some(current) = &mut self.current {
            if !current.advance(delta_time) {
                self.state = PlaybackState::Stopped;
                self.previous = None;
            }
        }
    }

    /// Name of the clip playing or last played
    #[must_use]
    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.clip.name.as_str())
    }

    /// Name of the clip fading out, if a crossfade is active
    #[must_use]
    pub fn fading_clip(&self) -> Option<&str> {
        self.previous.as_ref().map(|t| t.clip.name.as_str())
    }

    /// Local time of the current clip
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |t| t.time)
    }

    /// Weight of the current clip in `[0, 1]`; 1 outside a crossfade
    #[must_use]
    pub fn blend_weight(&self) -> f32 {
        if self.previous.is_none() || self.blend_time <= 0.0 {
            return 1.0;
        }
        (self.blend_elapsed / self.blend_time).clamp(0.0, 1.0)
    }

    /// Get playback state
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if currently playing
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }

    /// Number of clip starts so far
    #[must_use]
    pub const fn starts(&self) -> u32 {
        self.starts
    }

    /// Set playback speed
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// The clip library
    #[must_use]
    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }
}

impl Animator for AnimationPlayer {
    fn play(&mut self, clip: &str, blend: f32) {
        AnimationPlayer::play(self, clip, blend);
    }

    fn advance(&mut self, delta_time: f32) {
        self.update(delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> AnimationPlayer {
        AnimationPlayer::new(
            AnimationLibrary::new()
                .with_clip(AnimationClip::new("Idle", 2.0))
                .with_clip(AnimationClip::new("Walk", 1.0))
                .with_clip(AnimationClip::new("Wave", 0.5).with_looping(false)),
        )
    }

    #[test]
    fn test_play_same_clip_is_idempotent() {
        let mut player = player();
        player.play("Idle", 0.3);
        player.update(0.5);

        player.play("Idle", 0.3);

        assert_eq!(player.starts(), 1);
        assert!((player.current_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_crossfade() {
        let mut player = player();
        player.play("Idle", 0.3);
        player.update(1.0);

        player.play("Walk", 0.3);
        assert_eq!(player.current_clip(), Some("Walk"));
        assert_eq!(player.fading_clip(), Some("Idle"));
        assert_eq!(player.blend_weight(), 0.0);

        player.update(0.15);
        assert!((player.blend_weight() - 0.5).abs() < 1e-4);

        player.update(0.2);
        assert_eq!(player.fading_clip(), None);
        assert_eq!(player.blend_weight(), 1.0);
    }

    #[test]
    fn test_zero_blend_cuts() {
        let mut player = player();
        player.play("Idle", 0.0);
        player.play("Walk", 0.0);

        assert_eq!(player.fading_clip(), None);
        assert_eq!(player.starts(), 2);
    }

    #[test]
    fn test_looping_wraps() {
        let mut player = player();
        player.play("Walk", 0.0);

        player.update(0.6);
        player.update(0.6);

        assert!(player.is_playing());
        assert!((player.current_time() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_one_shot_stops_and_can_restart() {
        let mut player = player();
        player.play("Wave", 0.0);

        player.update(1.0);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_time(), 0.5);

        player.play("Wave", 0.0);
        assert!(player.is_playing());
        assert_eq!(player.starts(), 2);
    }

    #[test]
    fn test_unknown_clip_is_ignored() {
        let mut player = player();
        player.play("Idle", 0.3);

        player.play("Dance", 0.3);

        assert_eq!(player.current_clip(), Some("Idle"));
        assert_eq!(player.starts(), 1);
    }

    #[test]
    fn test_unknown_clip_reported_once() {
        let mut player = AnimationPlayer::new(AnimationLibrary::new());

        for _ in 0..60 {
            player.play("Idle", 0.3);
            player.play("Walk", 0.3);
        }

        assert_eq!(player.missing.len(), 2);
        assert!(player.missing.contains("Idle"));
        assert_eq!(player.starts(), 0);
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_speed_scales_playback() {
        let mut player = player();
        player.play("Idle", 0.0);

        player.set_speed(2.0);
        player.update(0.25);
        assert!((player.current_time() - 0.5).abs() < 1e-5);

        player.set_speed(-1.0);
        player.update(0.25);
        assert!((player.current_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pause_holds_time() {
        let mut player = player();
        player.play("Idle", 0.0);
        player.update(0.5);

        player.pause();
        player.update(1.0);
        assert!((player.current_time() - 0.5).abs() < 1e-5);

        // Paused clip is restarted by a new request for it
        player.play("Idle", 0.0);
        assert_eq!(player.starts(), 2);

        player.pause();
        player.resume();
        assert!(player.is_playing());
    }

    #[test]
    fn test_drives_through_animator_trait() {
        let mut player = player();
        let animator: &mut dyn Animator = &mut player;

        for _ in 0..10 {
            animator.play("Idle", 0.3);
            animator.advance(0.1);
        }

        assert_eq!(player.starts(), 1);
        assert!((player.current_time() - 1.0).abs() < 1e-4);
    }
}
