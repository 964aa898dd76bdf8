//! Scene file section formats
//!
//! A `.tscene` file is a `SceneFileHeader` followed by sections, each one a
//! `SectionHeader` and `count` records. Sections appear in export order:
//! textures, materials, skeletons, animations, entities, components, world,
//! scene. Records reference each other only by index into earlier sections.
//!
//! All headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization. Multi-byte values are little-endian.

pub mod animation;
pub mod header;
pub mod mesh;
pub mod section;
mod serialization;
pub mod skeleton;

pub use animation::*;
pub use header::*;
pub use mesh::*;
pub use section::*;
pub use serialization::BinarySerializable;
pub use skeleton::*;
