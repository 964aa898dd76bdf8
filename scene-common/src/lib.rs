//! Shared scene file format definitions
//!
//! This crate is the format layer shared between:
//! - `scene-export` (the exporter pipeline and its binary writer)
//! - engine-side loaders that read exported scenes back
//!
//! # Modules
//!
//! - [`scene_format`] - File constants (extension, magic bytes, version)
//! - [`formats`] - POD section headers of a `.tscene` file

pub mod formats;
pub mod scene_format;

pub use scene_format::{SceneFormat, SCENE_FORMAT};

// Re-export commonly used format items
pub use formats::{
    mat4_to_3x4, AnimationHeader, BinarySerializable, ExportFlags, MeshHeader, SceneFileHeader,
    SectionHeader, SectionKind, SkeletonHeader, BONE_MATRIX_SIZE, KEYFRAME_SIZE, VERTEX_SIZE,
};
