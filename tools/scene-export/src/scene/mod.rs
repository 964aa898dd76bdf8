//! Scene graph builder
//!
//! Walks the exported objects once and produces a [`CompiledScene`]:
//!
//! ```text
//! objects (visible, optionally selected only)
//!   mesh      ──► parent entity (own node, or the deforming armature's)
//!                 + one geometry component per submesh
//!   light     ──► light entity
//!   armature  ──► node entity + skeleton component
//! then:
//!   resolve parent links ──► world record ──► animations
//! ```
//!
//! Entity indices are registration order. Components reference entities by
//! index and are never parents themselves.

mod hierarchy;
mod lights;
mod materials;

use glam::Mat4;
use hashbrown::HashMap;

pub use hierarchy::hierarchy_terminates;
pub use lights::{convert_light, FalloffCodes};
pub use materials::{blend_op, MaterialRegistry};

use crate::animation::{compile_animation, AnimationRequest, AnimationSettings};
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::mesh::{bone_map, convert_mesh, BoneMap, MeshDiagnostics, MeshOptions};
use crate::model::{
    Animation, Bone, Color, Component, Entity, GeometryComponent, Material, Skeleton,
    SkeletonComponent, Spatial, Texture, World,
};
use crate::source::{ArmatureId, ObjectId, ObjectKind, SceneSource, SourceObject};

/// Everything the writer needs, in export order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledScene {
    pub name: String,
    pub textures: Vec<Texture>,
    pub materials: Vec<Material>,
    pub skeletons: Vec<Skeleton>,
    pub animations: Vec<Animation>,
    pub entities: Vec<Entity>,
    pub components: Vec<Component>,
    pub world: World,
    pub diagnostics: MeshDiagnostics,
}

impl CompiledScene {
    /// Entities plus components
    pub fn node_count(&self) -> usize {
        self.entities.len() + self.components.len()
    }

    pub fn report(&self) -> ExportReport {
        ExportReport {
            textures: self.textures.len(),
            materials: self.materials.len(),
            skeletons: self.skeletons.len(),
            animations: self.animations.len(),
            entities: self.entities.len(),
            components: self.components.len(),
            diagnostics: self.diagnostics,
        }
    }

    pub fn find_entity(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.name() == name)
    }
}

/// Summary of a finished export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub textures: usize,
    pub materials: usize,
    pub skeletons: usize,
    pub animations: usize,
    pub entities: usize,
    pub components: usize,
    pub diagnostics: MeshDiagnostics,
}

impl std::fmt::Display for ExportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entities, {} components, {} materials, {} textures, {} skeletons, {} animations",
            self.entities,
            self.components,
            self.materials,
            self.textures,
            self.skeletons,
            self.animations
        )?;
        if !self.diagnostics.is_clean() {
            write!(
                f,
                " ({} vertices lost influences, {} polygons skipped)",
                self.diagnostics.dropped_influences, self.diagnostics.skipped_polygons
            )?;
        }
        Ok(())
    }
}

/// Compile the source scene according to `config`
pub fn compile_scene<S: SceneSource + ?Sized>(
    source: &S,
    config: &ExportConfig,
) -> Result<CompiledScene, ExportError> {
    let mut builder = SceneBuilder::new(source, config);
    let objects = builder.exported_objects();
    tracing::info!("Compiling scene '{}' ({} objects)", source.scene_name(), objects.len());

    builder.build_entities(&objects)?;
    hierarchy::resolve_hierarchy(
        source,
        &mut builder.entities,
        &builder.entity_objects,
        &builder.entity_index,
    )?;

    let world = World {
        ambient: Color::rgb(source.world().ambient_color),
    };
    let animations = builder.compile_animations()?;

    let (materials, textures) = builder.materials.into_parts();
    let name = config
        .output
        .scene_name
        .clone()
        .unwrap_or_else(|| source.scene_name().to_string());

    Ok(CompiledScene {
        name,
        textures,
        materials,
        skeletons: builder.skeletons,
        animations,
        entities: builder.entities,
        components: builder.components,
        world,
        diagnostics: builder.diagnostics,
    })
}

struct SceneBuilder<'a, S: SceneSource + ?Sized> {
    source: &'a S,
    config: &'a ExportConfig,
    mesh_options: MeshOptions,
    animation_settings: AnimationSettings,
    entities: Vec<Entity>,
    /// Source object of each entity, index-aligned with `entities`
    entity_objects: Vec<ObjectId>,
    entity_index: HashMap<ObjectId, usize>,
    components: Vec<Component>,
    materials: MaterialRegistry,
    armatures: Vec<ArmatureId>,
    armature_index: HashMap<ArmatureId, usize>,
    skeletons: Vec<Skeleton>,
    diagnostics: MeshDiagnostics,
}

impl<'a, S: SceneSource + ?Sized> SceneBuilder<'a, S> {
    fn new(source: &'a S, config: &'a ExportConfig) -> Self {
        Self {
            source,
            config,
            mesh_options: config.mesh_options(),
            animation_settings: config.animation_settings(),
            entities: Vec::new(),
            entity_objects: Vec::new(),
            entity_index: HashMap::new(),
            components: Vec::new(),
            materials: MaterialRegistry::new(),
            armatures: Vec::new(),
            armature_index: HashMap::new(),
            skeletons: Vec::new(),
            diagnostics: MeshDiagnostics::default(),
        }
    }

    fn exported_objects(&self) -> Vec<ObjectId> {
        let selection_only = self.config.export.selection_only;
        self.source
            .objects()
            .into_iter()
            .filter(|&id| {
                self.source
                    .object(id)
                    .is_some_and(|o| o.visible && (o.selected || !selection_only))
            })
            .collect()
    }

    fn build_entities(&mut self, objects: &[ObjectId]) -> Result<(), ExportError> {
        for &id in objects {
            let object = self.source.object(id).ok_or(ExportError::UnknownObject(id))?;
            match object.kind {
                ObjectKind::Mesh => self.add_mesh_object(id, object)?,
                ObjectKind::Light => self.add_light_entity(id, object),
                ObjectKind::Armature => {
                    self.add_armature_entity(id, object)?;
                }
                ObjectKind::Other => {
                    tracing::debug!("Skipping object '{}' (unsupported type)", object.name);
                }
            }
        }
        Ok(())
    }

    fn push_entity(&mut self, id: ObjectId, entity: Entity) -> usize {
        let index = self.entities.len();
        self.entities.push(entity);
        self.entity_objects.push(id);
        self.entity_index.insert(id, index);
        index
    }

    fn add_node_entity(&mut self, id: ObjectId, object: &SourceObject) -> usize {
        if let Some(&index) = self.entity_index.get(&id) {
            return index;
        }
        let transform = self.source.world_transform(id);
        self.push_entity(id, Entity::node(object.name.clone(), transform))
    }

    fn add_light_entity(&mut self, id: ObjectId, object: &SourceObject) {
        if self.entity_index.contains_key(&id) {
            return;
        }
        let Some(light) = object.light.and_then(|l| self.source.light(l)) else {
            tracing::warn!("Light object '{}' has no light data, skipping", object.name);
            return;
        };
        let transform = self.source.world_transform(id);
        self.push_entity(
            id,
            Entity::light(
                object.name.clone(),
                transform,
                convert_light(light, self.config.lights.falloff_codes),
            ),
        );
    }

    /// Register an armature object as a node entity carrying a skeleton
    /// component
    fn add_armature_entity(
        &mut self,
        id: ObjectId,
        object: &SourceObject,
    ) -> Result<usize, ExportError> {
        if let Some(&index) = self.entity_index.get(&id) {
            return Ok(index);
        }

        let skeleton = match object.armature {
            Some(armature) => Some(self.register_skeleton(armature)?),
            None => {
                tracing::warn!("Armature object '{}' has no armature data", object.name);
                None
            }
        };

        let entity = self.add_node_entity(id, object);
        if let Some(skeleton) = skeleton {
            self.components.push(Component::Skeleton(SkeletonComponent {
                spatial: Spatial::child(object.name.clone(), Mat4::IDENTITY, entity),
                skeleton: skeleton as i32,
            }));
        }
        Ok(entity)
    }

    fn register_skeleton(&mut self, id: ArmatureId) -> Result<usize, ExportError> {
        if let Some(&index) = self.armature_index.get(&id) {
            return Ok(index);
        }
        let armature = self.source.armature(id).ok_or(ExportError::UnknownArmature(id))?;

        let bones = armature
            .bones
            .iter()
            .enumerate()
            .map(|(index, bone)| match bone.parent {
                Some(parent) if parent >= index => Err(ExportError::InvalidBoneHierarchy {
                    armature: armature.name.clone(),
                    bone: index,
                    parent,
                }),
                parent => Ok(Bone {
                    name: bone.name.clone(),
                    parent,
                    rest: bone.rest.to_mat4(),
                    length: bone.length,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Registered skeleton '{}' ({} bones)", armature.name, bones.len());
        self.skeletons.push(Skeleton {
            name: armature.name.clone(),
            bones,
        });
        self.armatures.push(id);
        let index = self.armatures.len() - 1;
        self.armature_index.insert(id, index);
        Ok(index)
    }

    /// Bone map of a mesh object deformed by an armature object
    fn bone_map_for(&self, object: &SourceObject) -> BoneMap {
        let armature = object
            .skin
            .and_then(|s| self.source.object(s))
            .and_then(|s| s.armature)
            .and_then(|a| self.source.armature(a));
        let Some(armature) = armature else {
            return BoneMap::new();
        };
        let map = bone_map(
            &object.vertex_groups,
            armature.bones.iter().map(|b| b.name.as_str()),
        );
        tracing::debug!(
            "Mesh '{}': {} of {} vertex groups bound to bones of '{}'",
            object.name,
            map.len(),
            object.vertex_groups.len(),
            armature.name
        );
        map
    }

    fn add_mesh_object(&mut self, id: ObjectId, object: &SourceObject) -> Result<(), ExportError> {
        let derived = self.source.derived_meshes(id);
        if derived.is_empty() {
            tracing::debug!("Mesh object '{}' has no geometry, skipping", object.name);
            return Ok(());
        }

        let parent = match object.skin {
            Some(skin) => {
                let armature = self.source.object(skin).ok_or(ExportError::UnknownObject(skin))?;
                self.add_armature_entity(skin, armature)?
            }
            None => self.add_node_entity(id, object),
        };
        let parent_world = self.entities[parent].spatial.transform;
        let object_world = self.source.world_transform(id);
        let bones = self.bone_map_for(object);

        for derived in derived {
            let Some(mesh) = self.source.mesh(derived.mesh) else {
                tracing::warn!(
                    "Object '{}' references unknown mesh {:?}",
                    object.name,
                    derived.mesh
                );
                continue;
            };

            let material_table = if self.config.export.save_materials {
                self.materials.register_mesh(self.source, mesh)
            } else {
                vec![-1; mesh.materials.len()]
            };
            if !self.config.export.save_meshes {
                continue;
            }

            let converted = convert_mesh(
                &derived.name,
                mesh,
                &bones,
                &material_table,
                self.mesh_options,
            );
            self.diagnostics += converted.diagnostics;

            let transform = parent_world.inverse() * object_world * derived.transform;
            for submesh in converted.submeshes {
                self.components.push(Component::Geometry(GeometryComponent {
                    spatial: Spatial::child(derived.name.clone(), transform, parent),
                    mesh: submesh,
                }));
            }
        }
        Ok(())
    }

    fn compile_animations(&self) -> Result<Vec<Animation>, ExportError> {
        if !self.config.export.save_animations {
            return Ok(Vec::new());
        }

        let requests = match &self.config.export.animation_library {
            Some(armature) => self.library_requests(armature)?,
            None => self.cutscene_requests(),
        };

        requests
            .into_iter()
            .map(|request| {
                compile_animation(self.source, request, &self.armatures, &self.animation_settings)
            })
            .collect()
    }

    /// Every entity's assigned clip
    fn cutscene_requests(&self) -> Vec<AnimationRequest> {
        self.entity_objects
            .iter()
            .enumerate()
            .filter_map(|(entity, &object)| {
                let clip = self.source.object(object)?.clip?;
                Some(AnimationRequest { object, clip, entity })
            })
            .collect()
    }

    /// Every clip in the source, played on one armature
    fn library_requests(&self, armature: &str) -> Result<Vec<AnimationRequest>, ExportError> {
        let Some(object) = self.source.find_object(armature) else {
            tracing::warn!(
                "Animation library armature '{}' not found, no animations exported",
                armature
            );
            return Ok(Vec::new());
        };
        let entity = *self
            .entity_index
            .get(&object)
            .ok_or_else(|| ExportError::UnregisteredObject(armature.to_string()))?;

        Ok(self
            .source
            .clips()
            .into_iter()
            .map(|clip| AnimationRequest { object, clip, entity })
            .collect())
    }
}
