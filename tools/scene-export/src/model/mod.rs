//! Engine-side scene model
//!
//! Everything the exporter produces lives here: geometry, skeletons,
//! animations, entities, components, materials, and the world record. The
//! writer consumes these types; nothing in here knows about the source scene.

mod animation;
mod entity;
mod material;
mod mesh;
mod skeleton;

pub use animation::{Animation, AnimationTrack, KeyTransform};
pub use entity::{
    Component, Entity, EntityKind, Falloff, GeometryComponent, Light, LightKind,
    SkeletonComponent, Spatial, World,
};
pub use material::{BlendOp, Color, DiffuseLayer, Material, Texture};
pub use mesh::{Face, Submesh, Vertex, MAX_INFLUENCES};
pub use skeleton::{Bone, Skeleton};
