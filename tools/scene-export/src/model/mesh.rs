//! Geometry types produced by the mesh pipeline

use crate::mesh::FaceCompare;

/// Number of bone influences carried per vertex
pub const MAX_INFLUENCES: usize = 4;

/// Engine vertex
///
/// Unused influence slots carry bone index -1 and weight 0. When any slot is
/// used, the weights sum to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    /// Texture coordinate, V already flipped for the engine convention
    pub uv: [f32; 2],
    pub weights: [f32; MAX_INFLUENCES],
    pub bones: [i32; MAX_INFLUENCES],
}

impl Vertex {
    /// Vertex with no texture coordinate and no influences
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            tangent: [0.0; 3],
            uv: [0.0; 2],
            weights: [0.0; MAX_INFLUENCES],
            bones: [-1; MAX_INFLUENCES],
        }
    }

    /// True when at least one influence slot references a bone
    pub fn is_skinned(&self) -> bool {
        self.bones.iter().any(|&b| b >= 0)
    }
}

/// Triangle referencing vertices by index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Face(pub [u32; 3]);

impl Face {
    /// Compare two faces under the chosen comparison mode.
    ///
    /// `Legacy` reproduces the historical comparator, which only reports a
    /// match when the first index agrees and the other two differ.
    pub fn matches(&self, other: &Face, mode: FaceCompare) -> bool {
        let (a, b) = (self.0, other.0);
        match mode {
            FaceCompare::Exact => a == b,
            FaceCompare::Legacy => a[0] == b[0] && a[1] != b[1] && a[2] != b[2],
        }
    }
}

/// A single-material (or merged multi-material) piece of a mesh
///
/// Faces index into `vertices` only; every index is below `vertices.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Submesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    /// Global material indices, -1 for unmapped slots
    pub materials: Vec<i32>,
    pub skinned: bool,
}

impl Submesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vertex_is_unskinned() {
        let v = Vertex::new([1.0, 2.0, 3.0], [0.0, 0.0, 1.0]);
        assert!(!v.is_skinned());
        assert_eq!(v.bones, [-1; 4]);
        assert_eq!(v.weights, [0.0; 4]);
    }

    #[test]
    fn test_face_exact_compare() {
        let a = Face([0, 1, 2]);
        assert!(a.matches(&Face([0, 1, 2]), FaceCompare::Exact));
        assert!(!a.matches(&Face([0, 2, 1]), FaceCompare::Exact));
    }

    #[test]
    fn test_face_legacy_compare() {
        let a = Face([0, 1, 2]);
        // identical faces do not match under the legacy comparator
        assert!(!a.matches(&Face([0, 1, 2]), FaceCompare::Legacy));
        assert!(a.matches(&Face([0, 5, 6]), FaceCompare::Legacy));
        assert!(!a.matches(&Face([3, 5, 6]), FaceCompare::Legacy));
        assert!(!a.matches(&Face([0, 1, 6]), FaceCompare::Legacy));
    }
}
