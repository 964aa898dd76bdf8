//! Flat shading and triangulation

use crate::model::{Face, Vertex};
use crate::source::SourceMesh;

use super::MeshDiagnostics;

/// Triangle tagged with the material slot of the polygon it came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Triangle {
    pub face: Face,
    pub slot: u32,
}

/// Turn polygons into triangles.
///
/// Flat-shaded polygons get their own copies of their corner vertices, each
/// carrying the polygon normal. Quads split along the 0-2 diagonal. Polygons
/// with more than four corners (or fewer than three) are skipped and counted.
///
/// `polygons` must be index-aligned with `mesh.polygons`.
pub(crate) fn triangulate(
    vertices: &mut Vec<Vertex>,
    polygons: &[Vec<u32>],
    mesh: &SourceMesh,
    diagnostics: &mut MeshDiagnostics,
) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(polygons.len() * 2);

    for (index, corners) in polygons.iter().enumerate() {
        let source = mesh.polygons.get(index);
        let smooth = source.is_some_and(|p| p.smooth);
        let slot = source.map_or(0, |p| p.material);

        if !(3..=4).contains(&corners.len()) {
            diagnostics.skipped_polygons += 1;
            tracing::warn!(
                "Mesh '{}': skipping polygon {} with {} corners (triangles and quads only)",
                mesh.name,
                index,
                corners.len()
            );
            continue;
        }

        let corners: Vec<u32> = if smooth {
            corners.clone()
        } else {
            let normal = mesh.polygon_normal(index);
            corners
                .iter()
                .map(|&c| {
                    let mut vertex = vertices[c as usize];
                    vertex.normal = normal;
                    vertices.push(vertex);
                    (vertices.len() - 1) as u32
                })
                .collect()
        };

        triangles.push(Triangle {
            face: Face([corners[0], corners[1], corners[2]]),
            slot,
        });
        if corners.len() == 4 {
            triangles.push(Triangle {
                face: Face([corners[0], corners[2], corners[3]]),
                slot,
            });
        }
    }
    triangles
}
