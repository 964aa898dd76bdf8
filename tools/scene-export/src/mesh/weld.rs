//! Per-submesh vertex compaction

use hashbrown::HashMap;

use crate::model::{Face, Vertex};

/// Copy the vertices referenced by `faces` into a compact local buffer.
///
/// Local indices follow first reference order.
pub(crate) fn weld(faces: &[Face], vertices: &[Vertex]) -> (Vec<Vertex>, Vec<Face>) {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut local_vertices = Vec::new();

    let local_faces = faces
        .iter()
        .map(|face| {
            Face(face.0.map(|global| {
                *remap.entry(global).or_insert_with(|| {
                    local_vertices.push(vertices[global as usize]);
                    (local_vertices.len() - 1) as u32
                })
            }))
        })
        .collect();

    (local_vertices, local_faces)
}
