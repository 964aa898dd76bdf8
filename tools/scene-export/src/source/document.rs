//! JSON scene document
//!
//! A scene dumped from the authoring tool. Handles are positions in the
//! corresponding list, so `ObjectId(2)` is the third entry of `objects`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Mat4;
use serde::{Deserialize, Serialize};

use super::{
    normalize_path, ArmatureId, ClipId, DerivedMesh, LightId, MaterialId, MeshId, ObjectId, PoseSnapshot,
    SceneSource, SourceArmature, SourceClip, SourceLight, SourceMaterial, SourceMesh,
    SourceObject, SourceWorld,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<SourceObject>,
    #[serde(default)]
    pub meshes: Vec<SourceMesh>,
    #[serde(default)]
    pub armatures: Vec<SourceArmature>,
    #[serde(default)]
    pub lights: Vec<SourceLight>,
    #[serde(default)]
    pub materials: Vec<SourceMaterial>,
    #[serde(default)]
    pub clips: Vec<SourceClip>,
    #[serde(default)]
    pub world: SourceWorld,
}

impl SceneDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Load and validate a document from disk.
    ///
    /// Relative texture paths are resolved against the document's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene: {}", path.display()))?;
        let mut document = Self::parse(&content)
            .with_context(|| format!("Failed to parse scene: {}", path.display()))?;

        if let Some(base) = path.parent() {
            document.resolve_texture_paths(base);
        }
        Ok(document)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(content).context("Invalid scene JSON")?;
        document.validate()?;
        Ok(document)
    }

    /// Check that every handle points at an existing entry and that the
    /// object and bone parent chains terminate
    pub fn validate(&self) -> Result<()> {
        for object in &self.objects {
            if let Some(parent) = object.parent {
                if parent.index() >= self.objects.len() {
                    bail!("Object '{}' has unknown parent {}", object.name, parent.0);
                }
            }
            if let Some(skin) = object.skin {
                if skin.index() >= self.objects.len() {
                    bail!("Object '{}' is skinned to unknown object {}", object.name, skin.0);
                }
            }
            check_handle(
                &object.name,
                "mesh",
                object.mesh.map(|m| m.index()),
                self.meshes.len(),
            )?;
            check_handle(
                &object.name,
                "light",
                object.light.map(|l| l.index()),
                self.lights.len(),
            )?;
            check_handle(
                &object.name,
                "armature",
                object.armature.map(|a| a.index()),
                self.armatures.len(),
            )?;
            check_handle(&object.name, "clip", object.clip.map(|c| c.index()), self.clips.len())?;
            for instance in &object.instances {
                check_handle(&object.name, "mesh", Some(instance.mesh.index()), self.meshes.len())?;
            }

            // A chain longer than the object count must revisit an object
            let mut current = object.parent;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if steps > self.objects.len() {
                    bail!("Object '{}' is part of a parent cycle", object.name);
                }
                current = self.objects.get(parent.index()).and_then(|p| p.parent);
            }
        }

        for mesh in &self.meshes {
            for polygon in &mesh.polygons {
                let missing = polygon
                    .vertices
                    .iter()
                    .find(|&&v| v as usize >= mesh.vertices.len());
                if let Some(&v) = missing {
                    bail!("Mesh '{}' references missing vertex {}", mesh.name, v);
                }
            }
            for slot in mesh.materials.iter().flatten() {
                if slot.index() >= self.materials.len() {
                    bail!("Mesh '{}' references missing material {}", mesh.name, slot.0);
                }
            }
        }

        for armature in &self.armatures {
            for (index, bone) in armature.bones.iter().enumerate() {
                if let Some(parent) = bone.parent {
                    if parent >= index {
                        bail!(
                            "Armature '{}': bone '{}' must come after its parent",
                            armature.name,
                            bone.name
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_texture_paths(&mut self, base: &Path) {
        for material in &mut self.materials {
            for slot in &mut material.texture_slots {
                if let Some(image) = &slot.image {
                    let path = Path::new(image);
                    let resolved = if path.is_relative() {
                        normalize_path(&base.join(path))
                    } else {
                        normalize_path(path)
                    };
                    slot.image = Some(resolved.to_string_lossy().into_owned());
                }
            }
        }
    }

    pub fn add_object(&mut self, object: SourceObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() as u32 - 1)
    }

    pub fn add_mesh(&mut self, mesh: SourceMesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() as u32 - 1)
    }

    pub fn add_armature(&mut self, armature: SourceArmature) -> ArmatureId {
        self.armatures.push(armature);
        ArmatureId(self.armatures.len() as u32 - 1)
    }

    pub fn add_light(&mut self, light: SourceLight) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() as u32 - 1)
    }

    pub fn add_material(&mut self, material: SourceMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn add_clip(&mut self, clip: SourceClip) -> ClipId {
        self.clips.push(clip);
        ClipId(self.clips.len() as u32 - 1)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SourceObject> {
        self.objects.get_mut(id.index())
    }
}

fn check_handle(object: &str, what: &str, index: Option<usize>, len: usize) -> Result<()> {
    match index {
        Some(i) if i >= len => bail!("Object '{}' references missing {} {}", object, what, i),
        _ => Ok(()),
    }
}

impl SceneSource for SceneDocument {
    fn scene_name(&self) -> &str {
        &self.name
    }

    fn objects(&self) -> Vec<ObjectId> {
        (0..self.objects.len() as u32).map(ObjectId).collect()
    }

    fn object(&self, id: ObjectId) -> Option<&SourceObject> {
        self.objects.get(id.index())
    }

    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(|i| ObjectId(i as u32))
    }

    fn world_transform(&self, id: ObjectId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        // Bounded walk; validate() rejects cycles but hand-built documents skip it
        for _ in 0..=self.objects.len() {
            let Some(object) = current.and_then(|c| self.object(c)) else {
                break;
            };
            matrix = object.transform.to_mat4() * matrix;
            current = object.parent;
        }
        matrix
    }

    fn derived_meshes(&self, id: ObjectId) -> Vec<DerivedMesh> {
        let Some(object) = self.object(id) else {
            return Vec::new();
        };
        if !object.instances.is_empty() {
            return object
                .instances
                .iter()
                .map(|instance| DerivedMesh {
                    name: instance.name.clone(),
                    mesh: instance.mesh,
                    transform: instance.transform.to_mat4(),
                })
                .collect();
        }
        object
            .mesh
            .map(|mesh| DerivedMesh {
                name: object.name.clone(),
                mesh,
                transform: Mat4::IDENTITY,
            })
            .into_iter()
            .collect()
    }

    fn mesh(&self, id: MeshId) -> Option<&SourceMesh> {
        self.meshes.get(id.index())
    }

    fn armature(&self, id: ArmatureId) -> Option<&SourceArmature> {
        self.armatures.get(id.index())
    }

    fn light(&self, id: LightId) -> Option<&SourceLight> {
        self.lights.get(id.index())
    }

    fn material(&self, id: MaterialId) -> Option<&SourceMaterial> {
        self.materials.get(id.index())
    }

    fn clip(&self, id: ClipId) -> Option<&SourceClip> {
        self.clips.get(id.index())
    }

    fn clips(&self) -> Vec<ClipId> {
        (0..self.clips.len() as u32).map(ClipId).collect()
    }

    fn world(&self) -> SourceWorld {
        self.world
    }

    fn pose_at(&self, object: ObjectId, clip: ClipId, frame: u32) -> Option<PoseSnapshot> {
        let object = self.object(object)?;
        let clip = self.clip(clip)?;

        // Frames past the recorded data hold the last one
        let sample = clip
            .frames
            .get((frame as usize).min(clip.frames.len().saturating_sub(1)));

        let local = sample
            .and_then(|s| s.object)
            .unwrap_or(object.transform)
            .to_mat4();

        let bones = object
            .armature
            .and_then(|a| self.armature(a))
            .map(|armature| {
                armature
                    .bones
                    .iter()
                    .map(|bone| {
                        sample
                            .and_then(|s| s.bones.get(&bone.name))
                            .unwrap_or(&bone.rest)
                            .to_mat4()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(PoseSnapshot { bones, local })
    }
}
