//! Animation compiler
//!
//! Samples one clip on one object into an [`Animation`]: a pose track per
//! sampler track plus a motion track. Frames are requested from the source
//! strictly in order, `0..frame_count`.

use crate::error::ExportError;
use crate::model::{Animation, AnimationTrack, KeyTransform};
use crate::sampler::PoseSampler;
use crate::source::{ArmatureId, ClipId, ObjectId, SceneSource};

/// Playback rate used when the configuration does not override it
pub const DEFAULT_PLAYBACK_RATE: f32 = 24.0;

/// Bone name that carries root motion by default
pub const DEFAULT_MOTION_BONE: &str = "MoverChannel";

/// Longest clip compiled by default (one hour at the default rate)
pub const DEFAULT_MAX_FRAMES: u32 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    pub playback_rate: f32,
    pub motion_bone: String,
    /// Clips sampling more frames than this are rejected
    pub max_frames: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            playback_rate: DEFAULT_PLAYBACK_RATE,
            motion_bone: DEFAULT_MOTION_BONE.to_string(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

/// Clip to compile, bound to an exported entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRequest {
    pub object: ObjectId,
    pub clip: ClipId,
    pub entity: usize,
}

/// Number of frames sampled for a clip ending at `end_frame` (inclusive)
pub fn frame_count(end_frame: f32) -> u32 {
    if end_frame.is_finite() && end_frame > 0.0 {
        (end_frame as u32).saturating_add(1)
    } else {
        1
    }
}

/// Sample `request.clip` on `request.object`.
///
/// The pose track at the motion index is held at identity; the motion
/// track receives that bone's samples instead. Without a motion bone the
/// motion track is an identity placeholder with index -1.
pub fn compile_animation<S: SceneSource + ?Sized>(
    source: &S,
    request: AnimationRequest,
    skeletons: &[ArmatureId],
    settings: &AnimationSettings,
) -> Result<Animation, ExportError> {
    let object = source
        .object(request.object)
        .ok_or(ExportError::UnknownObject(request.object))?;
    let clip = source
        .clip(request.clip)
        .ok_or(ExportError::UnknownClip(request.clip))?;

    let sampler = PoseSampler::for_object(source, object, &settings.motion_bone)?;
    let track_count = sampler.track_count();
    let motion = sampler.motion_track();
    if let Some(index) = motion {
        if index >= track_count {
            return Err(ExportError::MotionTrackOutOfRange {
                animation: clip.name.clone(),
                index,
                track_count,
            });
        }
    }

    let frames = frame_count(clip.frame_range[1]);
    if frames > settings.max_frames {
        return Err(ExportError::ClipTooLong {
            animation: clip.name.clone(),
            frames,
            max_frames: settings.max_frames,
        });
    }
    let mut pose_tracks: Vec<AnimationTrack> = (0..track_count)
        .map(|t| AnimationTrack::identity(sampler.track_name(t), t as i32, frames as usize))
        .collect();
    let mut motion_track = match motion {
        Some(index) => {
            AnimationTrack::identity(sampler.track_name(index), index as i32, frames as usize)
        }
        None => AnimationTrack::identity("", -1, frames as usize),
    };

    for frame in 0..frames {
        let snapshot = source
            .pose_at(request.object, request.clip, frame)
            .ok_or(ExportError::UnknownClip(request.clip))?;

        for (track, pose_track) in pose_tracks.iter_mut().enumerate() {
            pose_track.keys[frame as usize] = if Some(track) == motion {
                KeyTransform::IDENTITY
            } else {
                sampler.sample(&snapshot, track)
            };
        }
        if let Some(index) = motion {
            motion_track.keys[frame as usize] = sampler.sample(&snapshot, index);
        }
    }

    tracing::info!(
        "Compiled animation '{}' on '{}': {} frames, {} tracks",
        clip.name,
        object.name,
        frames,
        track_count
    );

    Ok(Animation {
        name: clip.name.clone(),
        skeleton: sampler.skeleton_index(skeletons),
        entity: request.entity as i32,
        playback_rate: settings.playback_rate,
        frame_count: frames,
        pose_tracks,
        motion_track,
    })
}
