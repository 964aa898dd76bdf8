//! scene-export library
//!
//! Converts an authoring-tool scene graph into the engine's scene format.
//! The pipeline is usable without the CLI: build a [`SceneDocument`] (or any
//! other [`SceneSource`]), compile it with [`compile_scene`], and stream the
//! result into a [`SceneWriter`].

pub mod animation;
pub mod config;
pub mod error;
pub mod mesh;
pub mod model;
pub mod sampler;
pub mod scene;
pub mod source;
pub mod writer;

pub use config::ExportConfig;
pub use error::ExportError;
pub use scene::{compile_scene, CompiledScene, ExportReport};
pub use source::{SceneDocument, SceneSource};
pub use writer::{export_scene, BinarySceneWriter, SceneWriter};

// Re-export the scene file format from scene-common
pub use scene_common::{SceneFormat, SCENE_FORMAT};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Compile `source` and write it as a binary scene under `destination`.
///
/// Returns the written path with the export summary.
pub fn export_to_directory<S: SceneSource + ?Sized>(
    source: &S,
    config: &ExportConfig,
    destination: &Path,
) -> Result<(PathBuf, ExportReport)> {
    let scene = compile_scene(source, config)
        .with_context(|| format!("Failed to compile scene '{}'", source.scene_name()))?;
    let report = scene.report();
    if !report.diagnostics.is_clean() {
        tracing::warn!(
            "Scene '{}': {} vertices lost influences, {} polygons skipped",
            scene.name,
            report.diagnostics.dropped_influences,
            report.diagnostics.skipped_polygons
        );
    }

    let mut writer = BinarySceneWriter::new(destination);
    export_scene(&scene, &mut writer, config.flags())?;
    let path = writer
        .output_path()
        .map(Path::to_path_buf)
        .context("Writer finished without producing a file")?;
    Ok((path, report))
}
