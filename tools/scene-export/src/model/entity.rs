//! Entities, components, and the world record
//!
//! Entities are addressable scene nodes; components hang off an entity and
//! are never parents themselves. Both carry the same [`Spatial`] header.

use glam::Mat4;

use super::material::Color;
use super::mesh::Submesh;

/// Name, transform, and parent shared by entities and components
///
/// `transform` is relative to the parent entity once the hierarchy is
/// resolved. Before resolution an entity's transform is its world matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Spatial {
    pub name: String,
    pub transform: Mat4,
    /// Entity index of the parent, -1 for roots
    pub parent: i32,
}

impl Spatial {
    pub fn root(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            parent: -1,
        }
    }

    pub fn child(name: impl Into<String>, transform: Mat4, parent: usize) -> Self {
        Self {
            name: name.into(),
            transform,
            parent: parent as i32,
        }
    }

    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
    Hemisphere = 3,
    Area = 4,
}

/// Distance attenuation curve of a point or spot light
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Falloff {
    Constant,
    InverseLinear,
    InverseSquare,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub strength: f32,
    pub radius: f32,
    pub specular: bool,
    /// Spot lights only
    pub spot_blend: f32,
    pub spot_size: f32,
    pub only_shadow: bool,
    /// Point and spot lights only
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
    pub falloff: Falloff,
    /// Written code for `falloff`, which depends on the configured numbering
    pub falloff_code: u32,
    /// Unused by hemisphere lights
    pub shadow_color: Color,
    pub cast_shadows: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Node,
    Light(Light),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub spatial: Spatial,
    pub kind: EntityKind,
}

impl Entity {
    pub fn node(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            spatial: Spatial::root(name, transform),
            kind: EntityKind::Node,
        }
    }

    pub fn light(name: impl Into<String>, transform: Mat4, light: Light) -> Self {
        Self {
            spatial: Spatial::root(name, transform),
            kind: EntityKind::Light(light),
        }
    }

    pub fn name(&self) -> &str {
        &self.spatial.name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeometryComponent {
    pub spatial: Spatial,
    pub mesh: Submesh,
}

/// Skeleton carrier attached to an armature's entity
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonComponent {
    pub spatial: Spatial,
    pub skeleton: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Geometry(GeometryComponent),
    Skeleton(SkeletonComponent),
}

impl Component {
    pub fn spatial(&self) -> &Spatial {
        match self {
            Component::Geometry(g) => &g.spatial,
            Component::Skeleton(s) => &s.spatial,
        }
    }
}

/// Global scene settings
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub ambient: Color,
}

impl Default for World {
    fn default() -> Self {
        Self {
            ambient: Color::BLACK,
        }
    }
}
