//! Material and texture registration
//!
//! Materials are deduplicated by source handle (plus one shared record for
//! empty slots), textures by lexically normalized file path. Registration order is export order.

use std::path::Path;

use hashbrown::HashMap;

use crate::model::{BlendOp, Color, DiffuseLayer, Material, Texture};
use crate::source::{
    normalize_path, MaterialId, SceneSource, SourceBlend, SourceMaterial, SourceMesh,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MaterialKey {
    Unassigned,
    Source(MaterialId),
}

#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    material_index: HashMap<MaterialKey, usize>,
    textures: Vec<Texture>,
    texture_index: HashMap<String, usize>,
}

pub fn blend_op(blend: SourceBlend) -> BlendOp {
    match blend {
        SourceBlend::Mix => BlendOp::Mix,
        SourceBlend::Add => BlendOp::Add,
        SourceBlend::Subtract => BlendOp::Subtract,
        SourceBlend::Multiply => BlendOp::Multiply,
        SourceBlend::Screen => BlendOp::Screen,
        SourceBlend::Difference => BlendOp::Difference,
        SourceBlend::Divide => BlendOp::Divide,
        SourceBlend::Darken => BlendOp::Darken,
        SourceBlend::Lighten => BlendOp::Lighten,
        SourceBlend::Hue => BlendOp::Hue,
        SourceBlend::Saturation => BlendOp::Saturation,
        SourceBlend::Value | SourceBlend::Color => BlendOp::Value,
        SourceBlend::SoftLight => BlendOp::SoftLight,
        SourceBlend::LinearLight => BlendOp::LinearLight,
    }
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every slot of `mesh` and return the slot to global index
    /// table
    pub fn register_mesh<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        mesh: &SourceMesh,
    ) -> Vec<i32> {
        mesh.materials
            .iter()
            .map(|slot| {
                let material = slot.and_then(|id| {
                    let found = source.material(id);
                    if found.is_none() {
                        tracing::warn!("Mesh '{}' references unknown material {:?}", mesh.name, id);
                    }
                    found.map(|m| (id, m))
                });
                self.register(material) as i32
            })
            .collect()
    }

    fn register(&mut self, material: Option<(MaterialId, &SourceMaterial)>) -> usize {
        let key = material.map_or(MaterialKey::Unassigned, |(id, _)| MaterialKey::Source(id));
        if let Some(&index) = self.material_index.get(&key) {
            return index;
        }

        let record = match material {
            Some((_, source)) => self.convert(source),
            None => Material::unassigned(),
        };
        tracing::debug!("Registered material '{}'", record.name);
        self.materials.push(record);
        let index = self.materials.len() - 1;
        self.material_index.insert(key, index);
        index
    }

    fn register_texture(&mut self, path: &str) -> usize {
        let path = normalize_path(Path::new(path))
            .to_string_lossy()
            .into_owned();
        if let Some(&index) = self.texture_index.get(&path) {
            return index;
        }
        self.textures.push(Texture { path: path.clone() });
        let index = self.textures.len() - 1;
        self.texture_index.insert(path, index);
        index
    }

    fn convert(&mut self, source: &SourceMaterial) -> Material {
        let diffuse = Color::rgb(source.diffuse_color);
        let image_slots: Vec<_> = source
            .texture_slots
            .iter()
            .filter_map(|slot| slot.image.as_deref().map(|path| (slot, path)))
            .collect();

        let normal_texture = image_slots
            .iter()
            .find(|(slot, _)| slot.use_map_normal)
            .map_or(-1, |(_, path)| self.register_texture(path) as i32);
        let specular_texture = image_slots
            .iter()
            .find(|(slot, _)| slot.use_map_specular)
            .map_or(-1, |(_, path)| self.register_texture(path) as i32);
        let diffuse_layers = image_slots
            .iter()
            .filter(|(slot, _)| slot.use_map_color_diffuse)
            .map(|(slot, path)| DiffuseLayer {
                texture: self.register_texture(path) as i32,
                op: blend_op(slot.blend_type),
                factor: slot.factor,
            })
            .collect();

        Material {
            name: source.name.clone(),
            ambient: diffuse.scaled(source.ambient),
            diffuse,
            specular: Color::rgb(source.specular_color),
            normal_texture,
            specular_texture,
            diffuse_layers,
        }
    }

    pub fn into_parts(self) -> (Vec<Material>, Vec<Texture>) {
        (self.materials, self.textures)
    }
}
