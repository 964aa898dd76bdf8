//! Sampled animation data

use glam::{Quat, Vec3};

/// Translation plus rotation keyframe
///
/// Rotation is stored as `[x, y, z, w]`. Sources that hand rotations over as
/// `(w, x, y, z)` go through [`KeyTransform::from_wxyz`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyTransform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
}

impl KeyTransform {
    pub const IDENTITY: Self = Self {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation: translation.to_array(),
            rotation: rotation.to_array(),
        }
    }

    /// Build from a `(w, x, y, z)` rotation
    pub fn from_wxyz(translation: [f32; 3], wxyz: [f32; 4]) -> Self {
        let [w, x, y, z] = wxyz;
        Self {
            translation,
            rotation: [x, y, z, w],
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_array(self.rotation)
    }
}

impl Default for KeyTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One keyframe per animation frame for a single track
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTrack {
    pub name: String,
    /// Track index in the sampler, -1 for the placeholder motion track
    pub index: i32,
    pub keys: Vec<KeyTransform>,
}

impl AnimationTrack {
    /// Track pre-filled with identity keys
    pub fn identity(name: impl Into<String>, index: i32, frame_count: usize) -> Self {
        Self {
            name: name.into(),
            index,
            keys: vec![KeyTransform::IDENTITY; frame_count],
        }
    }
}

/// Compiled animation clip bound to an entity
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub name: String,
    /// Skeleton index, -1 when the animated object is not an armature
    pub skeleton: i32,
    pub entity: i32,
    pub playback_rate: f32,
    pub frame_count: u32,
    pub pose_tracks: Vec<AnimationTrack>,
    pub motion_track: AnimationTrack,
}
