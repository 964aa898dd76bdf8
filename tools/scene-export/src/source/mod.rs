//! Scene source boundary
//!
//! The exporter reads the authoring scene only through [`SceneSource`]. The
//! source answers queries about objects, their data blocks, and evaluated
//! poses; it never mutates anything on the exporter's behalf. Pose
//! evaluation returns a self-contained [`PoseSnapshot`] for the requested
//! frame instead of moving a shared playhead.
//!
//! [`SceneDocument`] is the JSON-backed implementation used by the CLI.

mod document;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use document::SceneDocument;

macro_rules! source_handle {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u32);

            impl $name {
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

source_handle! {
    /// Handle of a scene object
    ObjectId,
    /// Handle of a mesh data block
    MeshId,
    /// Handle of an armature data block
    ArmatureId,
    /// Handle of a light data block
    LightId,
    /// Handle of a material data block
    MaterialId,
    /// Handle of an animation clip (action)
    ClipId,
}

/// Convert a `(w, x, y, z)` rotation into a glam quaternion
pub fn quat_from_wxyz(wxyz: [f32; 4]) -> Quat {
    let [w, x, y, z] = wxyz;
    Quat::from_xyzw(x, y, z, w)
}

/// Remove `.` components and fold `dir/..` pairs without touching the
/// filesystem. Leading `..` of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn identity_rotation() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn default_true() -> bool {
    true
}

/// Location / rotation / scale as authored
///
/// Rotation is `(w, x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceTransform {
    #[serde(default)]
    pub location: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

impl SourceTransform {
    pub const IDENTITY: Self = Self {
        location: [0.0; 3],
        rotation: [1.0, 0.0, 0.0, 0.0],
        scale: [1.0; 3],
    };

    pub fn from_location(location: [f32; 3]) -> Self {
        Self {
            location,
            ..Self::IDENTITY
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from(self.scale),
            quat_from_wxyz(self.rotation),
            Vec3::from(self.location),
        )
    }
}

impl Default for SourceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Mesh,
    Light,
    Armature,
    #[serde(other)]
    Other,
}

/// How an object is attached to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    #[default]
    Object,
    Bone,
    Lattice,
    Vertex,
    #[serde(other)]
    Other,
}

impl ParentKind {
    /// Attachment kinds that become entity parent links
    pub fn links_entities(self) -> bool {
        matches!(self, ParentKind::Object | ParentKind::Bone | ParentKind::Lattice)
    }
}

/// Mesh placed by an object (its own data or a duplicated instance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInstance {
    pub name: String,
    pub mesh: MeshId,
    /// Relative to the instancing object
    #[serde(default)]
    pub transform: SourceTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    /// Local transform relative to the parent object
    #[serde(default)]
    pub transform: SourceTransform,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub parent_kind: ParentKind,
    #[serde(default)]
    pub mesh: Option<MeshId>,
    #[serde(default)]
    pub light: Option<LightId>,
    /// Armature data block for armature objects
    #[serde(default)]
    pub armature: Option<ArmatureId>,
    /// Armature object deforming this mesh
    #[serde(default)]
    pub skin: Option<ObjectId>,
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    #[serde(default)]
    pub instances: Vec<SourceInstance>,
    /// Action currently assigned to the object
    #[serde(default)]
    pub clip: Option<ClipId>,
}

impl SourceObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visible: true,
            selected: false,
            transform: SourceTransform::IDENTITY,
            parent: None,
            parent_kind: ParentKind::Object,
            mesh: None,
            light: None,
            armature: None,
            skin: None,
            vertex_groups: Vec::new(),
            instances: Vec::new(),
            clip: None,
        }
    }
}

/// Weight of a vertex in one vertex group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    pub group: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVertex {
    pub position: [f32; 3],
    #[serde(default)]
    pub normal: [f32; 3],
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePolygon {
    pub vertices: Vec<u32>,
    #[serde(default)]
    pub smooth: bool,
    /// Material slot of the owning mesh
    #[serde(default)]
    pub material: u32,
    /// Face normal; computed from the corners when left at zero
    #[serde(default)]
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMesh {
    pub name: String,
    pub vertices: Vec<SourceVertex>,
    pub polygons: Vec<SourcePolygon>,
    /// Per-corner texture coordinates, polygon by polygon
    #[serde(default)]
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Material slots; `None` is an empty slot
    #[serde(default)]
    pub materials: Vec<Option<MaterialId>>,
}

impl SourceMesh {
    /// Face normal of polygon `index`, computed with Newell's method when the
    /// stored normal is zero
    pub fn polygon_normal(&self, index: usize) -> [f32; 3] {
        let Some(polygon) = self.polygons.get(index) else {
            return [0.0, 0.0, 1.0];
        };
        if polygon.normal != [0.0; 3] {
            return polygon.normal;
        }

        let corners: Vec<Vec3> = polygon
            .vertices
            .iter()
            .filter_map(|&v| self.vertices.get(v as usize))
            .map(|v| Vec3::from(v.position))
            .collect();
        let mut normal = Vec3::ZERO;
        for (i, current) in corners.iter().enumerate() {
            let next = corners[(i + 1) % corners.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.try_normalize().unwrap_or(Vec3::Z).to_array()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    /// Rest pose in armature space
    #[serde(default)]
    pub rest: SourceTransform,
    #[serde(default)]
    pub length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceArmature {
    pub name: String,
    pub bones: Vec<SourceBone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLightKind {
    Sun,
    Point,
    Spot,
    Hemi,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFalloff {
    Constant,
    InverseLinear,
    #[default]
    InverseSquare,
    #[serde(other)]
    Custom,
}

fn default_energy() -> f32 {
    1.0
}

fn default_distance() -> f32 {
    25.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLight {
    pub name: String,
    pub kind: SourceLightKind,
    #[serde(default = "unit_scale")]
    pub color: [f32; 3],
    #[serde(default = "default_energy")]
    pub energy: f32,
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_true")]
    pub use_specular: bool,
    #[serde(default)]
    pub spot_blend: f32,
    #[serde(default)]
    pub spot_size: f32,
    #[serde(default)]
    pub only_shadow: bool,
    #[serde(default)]
    pub linear_attenuation: f32,
    #[serde(default)]
    pub quadratic_attenuation: f32,
    #[serde(default)]
    pub falloff: SourceFalloff,
    #[serde(default)]
    pub shadow_color: [f32; 3],
    #[serde(default)]
    pub cast_shadows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceBlend {
    #[default]
    Mix,
    Add,
    Subtract,
    Multiply,
    Screen,
    Difference,
    Divide,
    Darken,
    Lighten,
    Hue,
    Saturation,
    Value,
    Color,
    SoftLight,
    LinearLight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    /// Image file; slots without one are ignored
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub use_map_normal: bool,
    #[serde(default)]
    pub use_map_specular: bool,
    #[serde(default)]
    pub use_map_color_diffuse: bool,
    #[serde(default)]
    pub blend_type: SourceBlend,
    #[serde(default = "default_energy")]
    pub factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMaterial {
    pub name: String,
    #[serde(default = "default_energy")]
    pub ambient: f32,
    #[serde(default = "unit_scale")]
    pub diffuse_color: [f32; 3],
    #[serde(default = "unit_scale")]
    pub specular_color: [f32; 3],
    #[serde(default)]
    pub texture_slots: Vec<TextureSlot>,
}

/// Evaluated state of one clip frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipFrame {
    /// Armature-space pose per bone name; bones left out stay at rest
    #[serde(default)]
    pub bones: BTreeMap<String, SourceTransform>,
    /// Object-local transform; the object's own transform when absent
    #[serde(default)]
    pub object: Option<SourceTransform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClip {
    pub name: String,
    /// Start and end frame; the end frame is inclusive
    pub frame_range: [f32; 2],
    #[serde(default)]
    pub frames: Vec<ClipFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWorld {
    #[serde(default)]
    pub ambient_color: [f32; 3],
}

impl Default for SourceWorld {
    fn default() -> Self {
        Self {
            ambient_color: [0.0; 3],
        }
    }
}

/// Mesh produced by an object, positioned relative to that object
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMesh {
    pub name: String,
    pub mesh: MeshId,
    pub transform: Mat4,
}

/// Pose of an object at one frame of one clip
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSnapshot {
    /// Armature-space pose matrix per bone, in armature order
    pub bones: Vec<Mat4>,
    /// Object-local matrix
    pub local: Mat4,
}

/// Read-only view of an authoring scene
pub trait SceneSource {
    fn scene_name(&self) -> &str;

    /// All objects, in scene order
    fn objects(&self) -> Vec<ObjectId>;

    fn object(&self, id: ObjectId) -> Option<&SourceObject>;

    fn find_object(&self, name: &str) -> Option<ObjectId>;

    /// World matrix of an object with its parent chain applied
    fn world_transform(&self, id: ObjectId) -> Mat4;

    /// Meshes an object contributes; empty for objects without geometry
    fn derived_meshes(&self, id: ObjectId) -> Vec<DerivedMesh>;

    fn mesh(&self, id: MeshId) -> Option<&SourceMesh>;

    fn armature(&self, id: ArmatureId) -> Option<&SourceArmature>;

    fn light(&self, id: LightId) -> Option<&SourceLight>;

    fn material(&self, id: MaterialId) -> Option<&SourceMaterial>;

    fn clip(&self, id: ClipId) -> Option<&SourceClip>;

    /// All clips, in library order
    fn clips(&self) -> Vec<ClipId>;

    fn world(&self) -> SourceWorld;

    /// Evaluate `object` under `clip` at `frame`.
    ///
    /// Returns `None` when either handle is unknown.
    fn pose_at(&self, object: ObjectId, clip: ClipId, frame: u32) -> Option<PoseSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/../t.png")), PathBuf::from("t.png"));
        assert_eq!(normalize_path(Path::new("./a/./b/t.png")), PathBuf::from("a/b/t.png"));
        assert_eq!(normalize_path(Path::new("../t.png")), PathBuf::from("../t.png"));
        assert_eq!(normalize_path(Path::new("/x/../../t.png")), PathBuf::from("/t.png"));
        assert_eq!(normalize_path(Path::new("a/b/../../..")), PathBuf::from(".."));
    }

    #[test]
    fn test_quat_from_wxyz_identity() {
        assert_eq!(quat_from_wxyz([1.0, 0.0, 0.0, 0.0]), Quat::IDENTITY);
    }

    #[test]
    fn test_source_transform_to_mat4() {
        let t = SourceTransform::from_location([1.0, 2.0, 3.0]);
        assert_eq!(t.to_mat4(), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_parent_kinds_that_link() {
        assert!(ParentKind::Object.links_entities());
        assert!(ParentKind::Bone.links_entities());
        assert!(ParentKind::Lattice.links_entities());
        assert!(!ParentKind::Vertex.links_entities());
        assert!(!ParentKind::Other.links_entities());
    }

    #[test]
    fn test_polygon_normal_computed_when_missing() {
        let mesh = SourceMesh {
            name: "tri".into(),
            vertices: vec![
                SourceVertex { position: [0.0, 0.0, 0.0], normal: [0.0; 3], groups: vec![] },
                SourceVertex { position: [1.0, 0.0, 0.0], normal: [0.0; 3], groups: vec![] },
                SourceVertex { position: [0.0, 1.0, 0.0], normal: [0.0; 3], groups: vec![] },
            ],
            polygons: vec![SourcePolygon {
                vertices: vec![0, 1, 2],
                smooth: false,
                material: 0,
                normal: [0.0; 3],
            }],
            uvs: None,
            materials: vec![],
        };
        let n = mesh.polygon_normal(0);
        assert!((n[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_object_kind_unknown_maps_to_other() {
        let kind: ObjectKind = serde_json::from_str("\"camera\"").unwrap();
        assert_eq!(kind, ObjectKind::Other);
    }
}
