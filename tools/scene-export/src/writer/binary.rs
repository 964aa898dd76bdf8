//! Binary `.tscene` writer
//!
//! # Layout
//! ```text
//! SceneFileHeader (16 bytes)
//! for each category, in export order:
//!     SectionHeader (8 bytes) + `count` records
//! SectionHeader(Scene, 1) + scene name
//! ```
//!
//! Strings are a u32 byte length followed by UTF-8. Matrices are 3×4
//! column-major f32. Colors are RGBA f32.

use anyhow::{Context, Result};
use glam::Mat4;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use scene_common::{
    mat4_to_3x4, AnimationHeader, BinarySerializable, ExportFlags, MeshHeader, SceneFileHeader,
    SectionHeader, SectionKind, SkeletonHeader, SCENE_FORMAT,
};

use super::SceneWriter;
use crate::model::{
    Animation, AnimationTrack, Color, Component, Entity, EntityKind, Material, Skeleton, Spatial,
    Submesh, Texture, World,
};

const ENTITY_NODE: u8 = 0;
const ENTITY_LIGHT: u8 = 1;
const COMPONENT_GEOMETRY: u8 = 0;
const COMPONENT_SKELETON: u8 = 1;

/// Buffers the scene in memory and writes `<destination>/<name>.tscene`
/// on assemble
#[derive(Debug)]
pub struct BinarySceneWriter {
    destination: PathBuf,
    buffer: Vec<u8>,
    output: Option<PathBuf>,
}

impl BinarySceneWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            buffer: Vec::new(),
            output: None,
        }
    }

    /// Path of the written file, once assembled
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Bytes produced so far
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn section(&mut self, kind: SectionKind, count: usize) -> Result<()> {
        write_header(&mut self.buffer, &SectionHeader::new(kind, count as u32))
    }
}

fn write_header<W: Write, H: BinarySerializable>(w: &mut W, header: &H) -> Result<()> {
    w.write_all(&header.serialize())?;
    Ok(())
}

fn write_u32<W: Write>(w: &mut W, value: u32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> Result<()> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn write_string<W: Write>(w: &mut W, value: &str) -> Result<()> {
    write_u32(w, value.len() as u32)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

fn write_matrix<W: Write>(w: &mut W, matrix: &Mat4) -> Result<()> {
    write_f32s(w, &mat4_to_3x4(matrix))
}

fn write_color<W: Write>(w: &mut W, color: Color) -> Result<()> {
    write_f32s(w, &color.0)
}

fn write_spatial<W: Write>(w: &mut W, spatial: &Spatial) -> Result<()> {
    write_string(w, &spatial.name)?;
    write_matrix(w, &spatial.transform)?;
    write_i32(w, spatial.parent)
}

/// Mesh record: header, vertices, faces, material indices
pub fn write_submesh<W: Write>(w: &mut W, mesh: &Submesh) -> Result<()> {
    write_string(w, &mesh.name)?;
    let header = MeshHeader::new(
        mesh.vertices.len() as u32,
        mesh.faces.len() as u32,
        mesh.materials.len() as u32,
        mesh.skinned,
    );
    write_header(w, &header)?;

    for v in &mesh.vertices {
        write_f32s(w, &v.position)?;
        write_f32s(w, &v.normal)?;
        write_f32s(w, &v.tangent)?;
        write_f32s(w, &v.uv)?;
        write_f32s(w, &v.weights)?;
        for bone in v.bones {
            write_i32(w, bone)?;
        }
    }
    for face in &mesh.faces {
        for index in face.0 {
            write_u32(w, index)?;
        }
    }
    for &material in &mesh.materials {
        write_i32(w, material)?;
    }
    Ok(())
}

fn write_track<W: Write>(w: &mut W, track: &AnimationTrack) -> Result<()> {
    write_string(w, &track.name)?;
    write_i32(w, track.index)?;
    for key in &track.keys {
        write_f32s(w, &key.translation)?;
        write_f32s(w, &key.rotation)?;
    }
    Ok(())
}

impl SceneWriter for BinarySceneWriter {
    fn begin(&mut self, node_count: usize, flags: ExportFlags) -> Result<()> {
        self.buffer.clear();
        self.output = None;
        let header = SceneFileHeader::new(node_count as u32, flags);
        write_header(&mut self.buffer, &header)
    }

    fn write_textures(&mut self, textures: &[Texture]) -> Result<()> {
        self.section(SectionKind::Textures, textures.len())?;
        for texture in textures {
            write_string(&mut self.buffer, &texture.path)?;
        }
        Ok(())
    }

    fn write_materials(&mut self, materials: &[Material]) -> Result<()> {
        self.section(SectionKind::Materials, materials.len())?;
        let w = &mut self.buffer;
        for material in materials {
            write_string(w, &material.name)?;
            write_color(w, material.ambient)?;
            write_color(w, material.diffuse)?;
            write_color(w, material.specular)?;
            write_i32(w, material.normal_texture)?;
            write_i32(w, material.specular_texture)?;
            write_u32(w, material.diffuse_layers.len() as u32)?;
            for layer in &material.diffuse_layers {
                write_i32(w, layer.texture)?;
                write_i32(w, layer.op.code())?;
                write_f32s(w, &[layer.factor])?;
            }
        }
        Ok(())
    }

    fn write_skeletons(&mut self, skeletons: &[Skeleton]) -> Result<()> {
        self.section(SectionKind::Skeletons, skeletons.len())?;
        let w = &mut self.buffer;
        for skeleton in skeletons {
            write_string(w, &skeleton.name)?;
            write_header(w, &SkeletonHeader::new(skeleton.bone_count() as u32))?;
            for bone in &skeleton.bones {
                write_string(w, &bone.name)?;
                write_i32(w, bone.parent.map_or(-1, |p| p as i32))?;
                write_matrix(w, &bone.rest)?;
                write_f32s(w, &[bone.length])?;
            }
        }
        Ok(())
    }

    fn write_animations(&mut self, animations: &[Animation]) -> Result<()> {
        self.section(SectionKind::Animations, animations.len())?;
        let w = &mut self.buffer;
        for animation in animations {
            write_string(w, &animation.name)?;
            let header = AnimationHeader::new(
                animation.skeleton,
                animation.entity,
                animation.playback_rate,
                animation.frame_count,
                animation.pose_tracks.len() as u32,
            );
            write_header(w, &header)?;
            for track in &animation.pose_tracks {
                write_track(w, track)?;
            }
            write_track(w, &animation.motion_track)?;
        }
        Ok(())
    }

    fn write_entities(&mut self, entities: &[Entity]) -> Result<()> {
        self.section(SectionKind::Entities, entities.len())?;
        let w = &mut self.buffer;
        for entity in entities {
            match &entity.kind {
                EntityKind::Node => {
                    w.write_all(&[ENTITY_NODE])?;
                    write_spatial(w, &entity.spatial)?;
                }
                EntityKind::Light(light) => {
                    w.write_all(&[ENTITY_LIGHT])?;
                    write_spatial(w, &entity.spatial)?;
                    write_u32(w, light.kind as u32)?;
                    write_color(w, light.color)?;
                    write_f32s(w, &[light.strength, light.radius])?;
                    w.write_all(&[
                        light.specular as u8,
                        light.only_shadow as u8,
                        light.cast_shadows as u8,
                    ])?;
                    write_f32s(
                        w,
                        &[
                            light.spot_blend,
                            light.spot_size,
                            light.linear_attenuation,
                            light.quadratic_attenuation,
                        ],
                    )?;
                    write_u32(w, light.falloff_code)?;
                    write_color(w, light.shadow_color)?;
                }
            }
        }
        Ok(())
    }

    fn write_components(&mut self, components: &[Component]) -> Result<()> {
        self.section(SectionKind::Components, components.len())?;
        let w = &mut self.buffer;
        for component in components {
            match component {
                Component::Geometry(geometry) => {
                    w.write_all(&[COMPONENT_GEOMETRY])?;
                    write_spatial(w, &geometry.spatial)?;
                    write_submesh(w, &geometry.mesh)?;
                }
                Component::Skeleton(skeleton) => {
                    w.write_all(&[COMPONENT_SKELETON])?;
                    write_spatial(w, &skeleton.spatial)?;
                    write_i32(w, skeleton.skeleton)?;
                }
            }
        }
        Ok(())
    }

    fn write_world(&mut self, world: &World) -> Result<()> {
        self.section(SectionKind::World, 1)?;
        write_color(&mut self.buffer, world.ambient)
    }

    fn assemble(&mut self, scene_name: &str) -> Result<()> {
        self.section(SectionKind::Scene, 1)?;
        write_string(&mut self.buffer, scene_name)?;

        fs::create_dir_all(&self.destination).with_context(|| {
            format!("Failed to create output directory: {}", self.destination.display())
        })?;
        let path = self
            .destination
            .join(format!("{}.{}", scene_name, SCENE_FORMAT.extension));
        fs::write(&path, &self.buffer)
            .with_context(|| format!("Failed to write scene: {}", path.display()))?;

        tracing::info!("Wrote {} ({} bytes)", path.display(), self.buffer.len());
        self.output = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Face, Vertex};
    use crate::writer::export_scene;
    use crate::scene::CompiledScene;
    use crate::mesh::MeshDiagnostics;
    use scene_common::VERTEX_SIZE;

    fn empty_scene(name: &str) -> CompiledScene {
        CompiledScene {
            name: name.into(),
            textures: vec![],
            materials: vec![],
            skeletons: vec![],
            animations: vec![],
            entities: vec![],
            components: vec![],
            world: World::default(),
            diagnostics: MeshDiagnostics::default(),
        }
    }

    #[test]
    fn test_submesh_record_size() {
        let mesh = Submesh {
            name: "m".into(),
            vertices: vec![Vertex::new([0.0; 3], [0.0, 0.0, 1.0]); 3],
            faces: vec![Face([0, 1, 2])],
            materials: vec![0, -1],
            skinned: false,
        };
        let mut bytes = Vec::new();
        write_submesh(&mut bytes, &mesh).unwrap();
        let expected = 4 + 1 + MeshHeader::SIZE + 3 * VERTEX_SIZE + 12 + 8;
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn test_writes_file_named_after_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BinarySceneWriter::new(dir.path().join("scenes"));
        export_scene(&empty_scene("Level"), &mut writer, ExportFlags::all()).unwrap();

        let path = writer.output_path().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("scenes").join("Level.tscene"));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, writer.bytes());

        let header = SceneFileHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.node_count, 0);
        assert_eq!(header.flags, ExportFlags::all());

        let first = SectionHeader::from_bytes(&bytes[SceneFileHeader::SIZE..]).unwrap();
        assert_eq!(first.kind, SectionKind::Textures);
        assert_eq!(first.count, 0);
    }

    #[test]
    fn test_section_order_in_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BinarySceneWriter::new(dir.path());
        export_scene(&empty_scene("S"), &mut writer, ExportFlags::empty()).unwrap();

        // every section of an empty scene is a bare header except world and scene
        let bytes = writer.bytes();
        let mut offset = SceneFileHeader::SIZE;
        let mut kinds = Vec::new();
        for _ in 0..6 {
            let section = SectionHeader::from_bytes(&bytes[offset..]).unwrap();
            kinds.push(section.kind);
            offset += SectionHeader::SIZE;
        }
        assert_eq!(
            kinds,
            vec![
                SectionKind::Textures,
                SectionKind::Materials,
                SectionKind::Skeletons,
                SectionKind::Animations,
                SectionKind::Entities,
                SectionKind::Components,
            ]
        );
        let world = SectionHeader::from_bytes(&bytes[offset..]).unwrap();
        assert_eq!(world.kind, SectionKind::World);
    }
}
