//! Per-corner texture coordinates to per-vertex texture coordinates

use hashbrown::HashMap;

use crate::model::Vertex;

/// Texture coordinates compared at this many steps per unit
const UV_PRECISION: f64 = 1_000_000.0;

type UvKey = (i64, i64);

fn uv_key(uv: [f32; 2]) -> UvKey {
    (
        (uv[0] as f64 * UV_PRECISION).round() as i64,
        (uv[1] as f64 * UV_PRECISION).round() as i64,
    )
}

/// Engine texture coordinate for a key; V is negated
fn key_to_uv(key: UvKey) -> [f32; 2] {
    [
        (key.0 as f64 / UV_PRECISION) as f32,
        -(key.1 as f64 / UV_PRECISION) as f32,
    ]
}

/// Give every vertex a single texture coordinate.
///
/// The first corner that references a vertex assigns its coordinate. Later
/// corners with a different (rounded) coordinate are redirected to a copy of
/// the vertex, one copy per distinct coordinate. Without texture data the
/// input passes through untouched.
pub(crate) fn split_by_uv(
    mut vertices: Vec<Vertex>,
    polygons: &[Vec<u32>],
    corner_uvs: Option<&[[f32; 2]]>,
) -> (Vec<Vertex>, Vec<Vec<u32>>) {
    let Some(corner_uvs) = corner_uvs else {
        return (vertices, polygons.to_vec());
    };

    let mut assigned: Vec<Option<UvKey>> = vec![None; vertices.len()];
    let mut copies: HashMap<(u32, UvKey), u32> = HashMap::new();
    let mut corner = 0usize;
    let mut output = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        let mut remapped = Vec::with_capacity(polygon.len());
        for &index in polygon {
            let key = uv_key(corner_uvs.get(corner).copied().unwrap_or([0.0, 0.0]));
            corner += 1;

            let slot = index as usize;
            match assigned.get(slot).copied().flatten() {
                None if slot < assigned.len() => {
                    assigned[slot] = Some(key);
                    vertices[slot].uv = key_to_uv(key);
                    remapped.push(index);
                }
                Some(existing) if existing == key => remapped.push(index),
                Some(_) => {
                    let copy = *copies.entry((index, key)).or_insert_with(|| {
                        let mut vertex = vertices[slot];
                        vertex.uv = key_to_uv(key);
                        vertices.push(vertex);
                        (vertices.len() - 1) as u32
                    });
                    remapped.push(copy);
                }
                // Copies created above are never referenced by input corners
                None => remapped.push(index),
            }
        }
        output.push(remapped);
    }
    (vertices, output)
}
