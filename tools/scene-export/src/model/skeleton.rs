//! Skeleton records
//!
//! Bones are stored parent-first, so a bone's parent index is always lower
//! than its own and the list can be walked front to back.

use glam::Mat4;

/// Bone with its rest matrix in armature space
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, always lower than this bone's own index
    pub parent: Option<usize>,
    pub rest: Mat4,
    pub length: f32,
}

/// Exported skeleton definition, referenced by index from animations and
/// skeleton components
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }
}
