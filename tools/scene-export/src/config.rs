//! export.toml configuration
//!
//! Every field is optional; an empty file exports everything visible with
//! the default animation and mesh settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use scene_common::ExportFlags;

use crate::animation::{
    AnimationSettings, DEFAULT_MAX_FRAMES, DEFAULT_MOTION_BONE, DEFAULT_PLAYBACK_RATE,
};
use crate::mesh::{FaceCompare, MergePolicy, MeshOptions};
use crate::scene::FalloffCodes;

/// export.toml structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub animation: AnimationSection,
    #[serde(default)]
    pub mesh: MeshSection,
    #[serde(default)]
    pub lights: LightSection,
}

fn default_true() -> bool {
    true
}

/// What gets exported
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportSection {
    /// Only export selected objects
    #[serde(default)]
    pub selection_only: bool,

    /// Pair the selected armature with every clip instead of exporting the
    /// clips assigned to each object
    #[serde(default)]
    pub animation_library: Option<String>,

    #[serde(default = "default_true")]
    pub save_animations: bool,
    #[serde(default = "default_true")]
    pub save_materials: bool,
    #[serde(default = "default_true")]
    pub save_meshes: bool,
    #[serde(default = "default_true")]
    pub save_prefabs: bool,
    #[serde(default = "default_true")]
    pub save_objects: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            selection_only: false,
            animation_library: None,
            save_animations: true,
            save_materials: true,
            save_meshes: true,
            save_prefabs: true,
            save_objects: true,
        }
    }
}

/// Where the scene file goes
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputSection {
    /// Root of the engine filesystem
    #[serde(default)]
    pub filesystem_root: Option<PathBuf>,
    /// Directory below the root
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Overrides the source scene name
    #[serde(default)]
    pub scene_name: Option<String>,
}

fn default_motion_bone() -> String {
    DEFAULT_MOTION_BONE.to_string()
}

fn default_playback_rate() -> f32 {
    DEFAULT_PLAYBACK_RATE
}

fn default_max_frames() -> u32 {
    DEFAULT_MAX_FRAMES
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationSection {
    /// Bone whose samples form the motion track
    #[serde(default = "default_motion_bone")]
    pub motion_bone: String,
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f32,
    /// Longest clip, in frames, that is compiled
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            motion_bone: default_motion_bone(),
            playback_rate: default_playback_rate(),
            max_frames: default_max_frames(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeshSection {
    #[serde(default)]
    pub merge_policy: MergePolicy,
    #[serde(default)]
    pub face_compare: FaceCompare,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LightSection {
    #[serde(default)]
    pub falloff_codes: FalloffCodes,
}

impl ExportConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse export.toml")
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            merge_policy: self.mesh.merge_policy,
            face_compare: self.mesh.face_compare,
        }
    }

    pub fn animation_settings(&self) -> AnimationSettings {
        AnimationSettings {
            playback_rate: self.animation.playback_rate,
            motion_bone: self.animation.motion_bone.clone(),
            max_frames: self.animation.max_frames,
        }
    }

    /// Category flags recorded in the scene file header
    pub fn flags(&self) -> ExportFlags {
        let mut flags = ExportFlags::empty();
        flags.set(ExportFlags::ANIMATIONS, self.export.save_animations);
        flags.set(ExportFlags::MATERIALS, self.export.save_materials);
        flags.set(ExportFlags::MESHES, self.export.save_meshes);
        flags.set(ExportFlags::PREFABS, self.export.save_prefabs);
        flags.set(ExportFlags::OBJECTS, self.export.save_objects);
        flags
    }

    /// Directory the scene file is written to
    pub fn destination(&self, fallback_root: &Path) -> PathBuf {
        let root = self
            .output
            .filesystem_root
            .clone()
            .unwrap_or_else(|| fallback_root.to_path_buf());
        match &self.output.export_dir {
            Some(dir) => root.join(dir),
            None => root,
        }
    }
}
