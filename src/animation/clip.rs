//! Animation clips and the clip library
//!
//! Clips are referenced by name; the keyframe data lives with the host's
//! asset pipeline. Only what playback needs is kept here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Playback description of a named clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
    /// Whether playback wraps at the end
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

impl AnimationClip {
    /// Create a looping clip
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            looping: true,
        }
    }

    /// Set looping
    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

/// Clips known to an animation player, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<AnimationClip>", into = "Vec<AnimationClip>")]
pub struct AnimationLibrary {
    clips: FxHashMap<String, AnimationClip>,
}

impl AnimationLibrary {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip, replacing any clip with the same name
    pub fn insert(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    /// Add a clip (builder form)
    #[must_use]
    pub fn with_clip(mut self, clip: AnimationClip) -> Self {
        self.insert(clip);
        self
    }

    /// Look up a clip by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    /// Check if a clip exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Number of clips
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Check if the library is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl From<Vec<AnimationClip>> for AnimationLibrary {
    fn from(clips: Vec<AnimationClip>) -> Self {
        clips
            .into_iter()
            .fold(Self::new(), |library, clip| library.with_clip(clip))
    }
}

impl From<AnimationLibrary> for Vec<AnimationClip> {
    fn from(library: AnimationLibrary) -> Self {
        let mut clips: Vec<_> = library.clips.into_values().collect();
        clips.sort_by(|a, b| a.name.cmp(&b.name));
        clips
    }
}
