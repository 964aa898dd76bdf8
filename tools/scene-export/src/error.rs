//! Fatal export errors
//!
//! Only consistency failures live here. Data-loss conditions (too many
//! influences, unsupported polygons) are diagnostics: they are logged and
//! counted, and the export carries on.

use crate::source::{ArmatureId, ClipId, ObjectId};

/// Consistency error that aborts the export before anything is written
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    /// A parented object's parent was never registered as an entity
    /// (typically filtered out by a selection-only export)
    #[error("object '{object}' is parented to '{parent}', which was not exported")]
    UnresolvedParent { object: String, parent: String },

    /// The motion track designation points outside the sampled track range
    #[error("animation '{animation}' uses motion track {index} of {track_count} tracks")]
    MotionTrackOutOfRange {
        animation: String,
        index: usize,
        track_count: usize,
    },

    /// A bone's parent index is out of range or closes a cycle
    #[error("armature '{armature}': bone {bone} has invalid parent {parent}")]
    InvalidBoneHierarchy {
        armature: String,
        bone: usize,
        parent: usize,
    },

    /// An object needed for export is not registered as an entity
    #[error("object '{0}' is required by an animation but was not exported as an entity")]
    UnregisteredObject(String),

    /// A clip samples more frames than the configured limit
    #[error("animation '{animation}' spans {frames} frames, over the limit of {max_frames}")]
    ClipTooLong {
        animation: String,
        frames: u32,
        max_frames: u32,
    },

    #[error("scene source has no object {0:?}")]
    UnknownObject(ObjectId),

    #[error("scene source has no armature {0:?}")]
    UnknownArmature(ArmatureId),

    #[error("scene source has no clip {0:?}")]
    UnknownClip(ClipId),
}
