//! Programmatic scene documents for integration tests.
//!
//! - [`cube::cube_scene`]: one flat-shaded, textured cube with one material
//! - [`rig::rig_scene`]: a two-bone armature deforming a skinned quad, with a
//!   two-frame clip bending the tip bone

#![allow(dead_code)]

pub mod cube;
pub mod rig;

use std::path::Path;

use scene_export::SceneDocument;

/// Write `document` as JSON to `path`
pub fn write_document(document: &SceneDocument, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
