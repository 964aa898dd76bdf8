//! Pose samplers
//!
//! A sampler turns a [`PoseSnapshot`] into per-track keyframes. Armature
//! objects sample one track per bone, relative to the parent bone's pose and
//! corrected for the rest pose. Every other object samples a single track
//! holding its local transform.

use glam::Mat4;

use crate::error::ExportError;
use crate::model::KeyTransform;
use crate::source::{
    ArmatureId, ObjectKind, PoseSnapshot, SceneSource, SourceArmature, SourceObject,
};

/// Track name used for non-armature objects
pub const ENTITY_TRACK_NAME: &str = "EntityAnimTrack";

/// Samples bone tracks of an armature
#[derive(Debug, Clone)]
pub struct RigSampler<'a> {
    armature_id: ArmatureId,
    armature: &'a SourceArmature,
    rest: Vec<Mat4>,
    motion_track: Option<usize>,
}

impl<'a> RigSampler<'a> {
    pub fn new(armature_id: ArmatureId, armature: &'a SourceArmature, motion_bone: &str) -> Self {
        Self {
            armature_id,
            armature,
            rest: armature.bones.iter().map(|b| b.rest.to_mat4()).collect(),
            motion_track: armature.bones.iter().position(|b| b.name == motion_bone),
        }
    }

    fn pose(&self, snapshot: &PoseSnapshot, track: usize) -> Mat4 {
        snapshot
            .bones
            .get(track)
            .copied()
            .unwrap_or(self.rest[track])
    }

    /// Local bone transform with the rest pose factored out
    fn sample(&self, snapshot: &PoseSnapshot, track: usize) -> KeyTransform {
        let rest = self.rest[track];
        let pose = self.pose(snapshot, track);

        let local = match self.armature.bones[track].parent {
            Some(parent) => {
                let rest_local = self.rest[parent].inverse() * rest;
                let pose_local = self.pose(snapshot, parent).inverse() * pose;
                rest_local.inverse() * pose_local
            }
            None => rest.inverse() * pose,
        };

        let (_scale, rotation, translation) = local.to_scale_rotation_translation();
        KeyTransform::new(translation, rotation)
    }
}

#[derive(Debug, Clone)]
pub enum PoseSampler<'a> {
    Rig(RigSampler<'a>),
    Node,
}

impl<'a> PoseSampler<'a> {
    /// Pick the sampler variant for an object
    pub fn for_object<S: SceneSource + ?Sized>(
        source: &'a S,
        object: &SourceObject,
        motion_bone: &str,
    ) -> Result<Self, ExportError> {
        if object.kind != ObjectKind::Armature {
            return Ok(PoseSampler::Node);
        }
        match object.armature {
            Some(id) => {
                let armature = source.armature(id).ok_or(ExportError::UnknownArmature(id))?;
                Ok(PoseSampler::Rig(RigSampler::new(id, armature, motion_bone)))
            }
            None => Ok(PoseSampler::Node),
        }
    }

    pub fn track_count(&self) -> usize {
        match self {
            PoseSampler::Rig(rig) => rig.armature.bones.len(),
            PoseSampler::Node => 1,
        }
    }

    /// Track that carries root motion, if any
    pub fn motion_track(&self) -> Option<usize> {
        match self {
            PoseSampler::Rig(rig) => rig.motion_track,
            PoseSampler::Node => None,
        }
    }

    pub fn track_name(&self, track: usize) -> String {
        match self {
            PoseSampler::Rig(rig) => rig
                .armature
                .bones
                .get(track)
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            PoseSampler::Node => ENTITY_TRACK_NAME.to_string(),
        }
    }

    /// Index of the sampled armature among the exported skeletons, -1 when
    /// absent or not an armature
    pub fn skeleton_index(&self, skeletons: &[ArmatureId]) -> i32 {
        match self {
            PoseSampler::Rig(rig) => skeletons
                .iter()
                .position(|&s| s == rig.armature_id)
                .map_or(-1, |i| i as i32),
            PoseSampler::Node => -1,
        }
    }

    pub fn sample(&self, snapshot: &PoseSnapshot, track: usize) -> KeyTransform {
        match self {
            PoseSampler::Rig(rig) => rig.sample(snapshot, track),
            PoseSampler::Node => {
                let (_scale, rotation, translation) =
                    snapshot.local.to_scale_rotation_translation();
                KeyTransform::new(translation, rotation)
            }
        }
    }
}
