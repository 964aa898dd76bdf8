//! Geometry transform
//!
//! Converts one source mesh into engine submeshes:
//!
//! ```text
//! source vertices ──► influences (top 4, normalized)
//!        │
//!        ▼
//! per-corner UVs ──► per-vertex UVs (seam vertices copied)
//!        │
//!        ▼
//! flat shading + triangulation (quads split, n-gons skipped)
//!        │
//!        ▼
//! partition by material slot ──► merge identical partitions
//!        │
//!        ▼
//! weld each partition ──► Submesh { local vertices, faces, global materials }
//! ```

mod partition;
mod triangulate;
mod uv;
mod weights;
mod weld;

use std::ops::AddAssign;

pub use partition::{FaceCompare, MergePolicy};
pub use weights::{bone_map, extract_weights, BoneMap, Influences};

use crate::model::{Submesh, Vertex};
use crate::source::SourceMesh;

/// Data-loss conditions encountered while converting geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshDiagnostics {
    /// Vertices that had more than four influences
    pub dropped_influences: usize,
    /// Polygons that were neither triangles nor quads
    pub skipped_polygons: usize,
}

impl MeshDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped_influences == 0 && self.skipped_polygons == 0
    }
}

impl AddAssign for MeshDiagnostics {
    fn add_assign(&mut self, other: Self) {
        self.dropped_influences += other.dropped_influences;
        self.skipped_polygons += other.skipped_polygons;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshOptions {
    pub merge_policy: MergePolicy,
    pub face_compare: FaceCompare,
}

/// Result of converting one source mesh
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedMesh {
    pub submeshes: Vec<Submesh>,
    /// True when any submesh carries bone influences
    pub is_skin: bool,
    pub diagnostics: MeshDiagnostics,
}

/// Convert `mesh` into submeshes named `<name>_<n>`.
///
/// `material_table` maps the mesh's material slots to global material
/// indices; slots past its end map to -1. A mesh without any triangles
/// yields a single empty submesh.
pub fn convert_mesh(
    name: &str,
    mesh: &SourceMesh,
    bones: &BoneMap,
    material_table: &[i32],
    options: MeshOptions,
) -> ConvertedMesh {
    let mut diagnostics = MeshDiagnostics::default();

    let vertices: Vec<Vertex> = mesh
        .vertices
        .iter()
        .map(|source| {
            let influences = extract_weights(&source.groups, bones);
            if influences.dropped > 0 {
                diagnostics.dropped_influences += 1;
            }
            Vertex {
                weights: influences.weights,
                bones: influences.bones,
                ..Vertex::new(source.position, source.normal)
            }
        })
        .collect();
    if diagnostics.dropped_influences > 0 {
        tracing::warn!(
            "Mesh '{}': {} vertices have more than 4 bone influences, weakest dropped",
            name,
            diagnostics.dropped_influences
        );
    }

    let polygons: Vec<Vec<u32>> = mesh.polygons.iter().map(|p| p.vertices.clone()).collect();
    let (mut vertices, polygons) = uv::split_by_uv(vertices, &polygons, mesh.uvs.as_deref());
    let triangles = triangulate::triangulate(&mut vertices, &polygons, mesh, &mut diagnostics);

    if triangles.is_empty() {
        tracing::debug!("Mesh '{}' has no triangles", name);
        return ConvertedMesh {
            submeshes: vec![Submesh {
                name: format!("{}_0", name),
                vertices: Vec::new(),
                faces: Vec::new(),
                materials: Vec::new(),
                skinned: false,
            }],
            is_skin: false,
            diagnostics,
        };
    }

    let partitions = partition::partition_by_slot(name, &triangles);
    let partitions =
        partition::merge_identical(partitions, options.merge_policy, options.face_compare);

    let submeshes: Vec<Submesh> = partitions
        .into_iter()
        .map(|partition| {
            let (local_vertices, faces) = weld::weld(&partition.faces, &vertices);
            let skinned = local_vertices.iter().any(Vertex::is_skinned);
            let materials = partition
                .slots
                .iter()
                .map(|&slot| material_table.get(slot as usize).copied().unwrap_or(-1))
                .collect();
            Submesh {
                name: partition.name,
                vertices: local_vertices,
                faces,
                materials,
                skinned,
            }
        })
        .collect();

    let is_skin = submeshes.iter().any(|s| s.skinned);
    tracing::debug!(
        "Mesh '{}': {} submeshes, {} vertices after splitting",
        name,
        submeshes.len(),
        vertices.len()
    );

    ConvertedMesh {
        submeshes,
        is_skin,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Face;
    use crate::source::{GroupWeight, SourcePolygon, SourceVertex};

    fn convert_unskinned(name: &str, mesh: &SourceMesh, materials: &[i32]) -> ConvertedMesh {
        convert_mesh(name, mesh, &BoneMap::new(), materials, MeshOptions::default())
    }

    fn quad_mesh(smooth: bool, uvs: Option<Vec<[f32; 2]>>) -> SourceMesh {
        let corners = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        SourceMesh {
            name: "Quad".into(),
            vertices: corners
                .iter()
                .map(|&position| SourceVertex {
                    position,
                    normal: [0.0, 0.0, 1.0],
                    groups: vec![],
                })
                .collect(),
            polygons: vec![SourcePolygon {
                vertices: vec![0, 1, 2, 3],
                smooth,
                material: 0,
                normal: [0.0, 0.0, 1.0],
            }],
            uvs,
            materials: vec![None],
        }
    }

    #[test]
    fn test_smooth_quad_becomes_two_triangles() {
        let converted = convert_unskinned("Quad", &quad_mesh(true, None), &[0]);
        assert_eq!(converted.submeshes.len(), 1);
        let sub = &converted.submeshes[0];
        assert_eq!(sub.name, "Quad_0");
        assert_eq!(sub.vertices.len(), 4);
        assert_eq!(sub.faces, vec![Face([0, 1, 2]), Face([0, 2, 3])]);
        assert_eq!(sub.materials, vec![0]);
        assert!(!converted.is_skin);
        assert!(converted.diagnostics.is_clean());
    }

    #[test]
    fn test_flat_quad_welds_to_four_vertices() {
        let converted = convert_unskinned("Quad", &quad_mesh(false, None), &[]);
        let sub = &converted.submeshes[0];
        // the originals are orphaned by flat shading and dropped by welding
        assert_eq!(sub.vertices.len(), 4);
        assert_eq!(sub.materials, vec![-1]);
    }

    #[test]
    fn test_uvs_are_negated() {
        let uvs = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let converted = convert_unskinned("Quad", &quad_mesh(true, Some(uvs)), &[0]);
        let sub = &converted.submeshes[0];
        assert_eq!(sub.vertices[2].uv, [1.0, -1.0]);
    }

    #[test]
    fn test_empty_mesh_yields_one_empty_submesh() {
        let mut mesh = quad_mesh(true, None);
        mesh.polygons.clear();
        let converted = convert_unskinned("Empty", &mesh, &[]);
        assert_eq!(converted.submeshes.len(), 1);
        assert!(converted.submeshes[0].is_empty());
        assert_eq!(converted.submeshes[0].name, "Empty_0");
    }

    #[test]
    fn test_skinned_vertices_mark_submesh() {
        let mut mesh = quad_mesh(true, None);
        mesh.vertices[0].groups = vec![GroupWeight { group: 0, weight: 1.0 }];
        let mut bones = BoneMap::new();
        bones.insert(0, 0);

        let converted = convert_mesh("Quad", &mesh, &bones, &[0], MeshOptions::default());
        assert!(converted.is_skin);
        assert!(converted.submeshes[0].skinned);
        assert_eq!(converted.submeshes[0].vertices[0].bones, [0, -1, -1, -1]);
    }

    #[test]
    fn test_local_indices_are_in_range() {
        let mut mesh = quad_mesh(false, None);
        mesh.polygons.push(SourcePolygon {
            vertices: vec![0, 2, 3],
            smooth: true,
            material: 1,
            normal: [0.0, 0.0, 1.0],
        });
        mesh.materials.push(None);

        let converted = convert_unskinned("Quad", &mesh, &[3, 5]);
        assert_eq!(converted.submeshes.len(), 2);
        assert_eq!(converted.submeshes[1].materials, vec![5]);
        for sub in &converted.submeshes {
            for face in &sub.faces {
                assert!(face.0.iter().all(|&i| (i as usize) < sub.vertices.len()));
            }
        }
    }
}
