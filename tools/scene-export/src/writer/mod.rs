//! Scene writer boundary
//!
//! [`export_scene`] hands a [`CompiledScene`] to a [`SceneWriter`] one
//! category at a time, always in the same order:
//!
//! ```text
//! begin ─► textures ─► materials ─► skeletons ─► animations
//!       ─► entities ─► components ─► world ─► assemble
//! ```
//!
//! The writer decides what the bytes look like; [`BinarySceneWriter`]
//! produces a `.tscene` file.

mod binary;

use anyhow::Result;
use scene_common::ExportFlags;

pub use binary::BinarySceneWriter;

use crate::model::{Animation, Component, Entity, Material, Skeleton, Texture, World};
use crate::scene::CompiledScene;

/// Sink for compiled scene records
pub trait SceneWriter {
    fn begin(&mut self, node_count: usize, flags: ExportFlags) -> Result<()>;
    fn write_textures(&mut self, textures: &[Texture]) -> Result<()>;
    fn write_materials(&mut self, materials: &[Material]) -> Result<()>;
    fn write_skeletons(&mut self, skeletons: &[Skeleton]) -> Result<()>;
    fn write_animations(&mut self, animations: &[Animation]) -> Result<()>;
    fn write_entities(&mut self, entities: &[Entity]) -> Result<()>;
    fn write_components(&mut self, components: &[Component]) -> Result<()>;
    fn write_world(&mut self, world: &World) -> Result<()>;
    /// Finish the scene under `scene_name`
    fn assemble(&mut self, scene_name: &str) -> Result<()>;
}

/// Stream `scene` into `writer` in export order
pub fn export_scene<W: SceneWriter + ?Sized>(
    scene: &CompiledScene,
    writer: &mut W,
    flags: ExportFlags,
) -> Result<()> {
    writer.begin(scene.node_count(), flags)?;
    writer.write_textures(&scene.textures)?;
    writer.write_materials(&scene.materials)?;
    writer.write_skeletons(&scene.skeletons)?;
    writer.write_animations(&scene.animations)?;
    writer.write_entities(&scene.entities)?;
    writer.write_components(&scene.components)?;
    writer.write_world(&scene.world)?;
    writer.assemble(&scene.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshDiagnostics;

    #[derive(Default)]
    struct CallLog(Vec<String>);

    impl SceneWriter for CallLog {
        fn begin(&mut self, node_count: usize, _flags: ExportFlags) -> Result<()> {
            self.0.push(format!("begin:{node_count}"));
            Ok(())
        }
        fn write_textures(&mut self, _: &[Texture]) -> Result<()> {
            self.0.push("textures".into());
            Ok(())
        }
        fn write_materials(&mut self, _: &[Material]) -> Result<()> {
            self.0.push("materials".into());
            Ok(())
        }
        fn write_skeletons(&mut self, _: &[Skeleton]) -> Result<()> {
            self.0.push("skeletons".into());
            Ok(())
        }
        fn write_animations(&mut self, _: &[Animation]) -> Result<()> {
            self.0.push("animations".into());
            Ok(())
        }
        fn write_entities(&mut self, _: &[Entity]) -> Result<()> {
            self.0.push("entities".into());
            Ok(())
        }
        fn write_components(&mut self, _: &[Component]) -> Result<()> {
            self.0.push("components".into());
            Ok(())
        }
        fn write_world(&mut self, _: &World) -> Result<()> {
            self.0.push("world".into());
            Ok(())
        }
        fn assemble(&mut self, scene_name: &str) -> Result<()> {
            self.0.push(format!("assemble:{scene_name}"));
            Ok(())
        }
    }

    #[test]
    fn test_export_order() {
        let scene = CompiledScene {
            name: "Empty".into(),
            textures: vec![],
            materials: vec![],
            skeletons: vec![],
            animations: vec![],
            entities: vec![Entity::node("root", glam::Mat4::IDENTITY)],
            components: vec![],
            world: World::default(),
            diagnostics: MeshDiagnostics::default(),
        };
        let mut log = CallLog::default();
        export_scene(&scene, &mut log, ExportFlags::all()).unwrap();
        assert_eq!(
            log.0,
            vec![
                "begin:1", "textures", "materials", "skeletons", "animations", "entities",
                "components", "world", "assemble:Empty",
            ]
        );
    }
}
