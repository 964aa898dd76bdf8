//! Unit cube: 8 vertices, 6 flat quads, per-corner UVs, one material

use scene_export::source::{
    ObjectKind, SourceMaterial, SourceMesh, SourceObject, SourcePolygon, SourceTransform,
    SourceVertex, TextureSlot,
};
use scene_export::SceneDocument;

pub const CUBE_NAME: &str = "Cube";
pub const FACE_COUNT: usize = 6;

const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Quads wound counter-clockwise seen from outside
const QUADS: [([u32; 4], [f32; 3]); FACE_COUNT] = [
    ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 3, 7, 6], [0.0, 1.0, 0.0]),
    ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
    ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
];

pub fn cube_mesh() -> SourceMesh {
    let vertices = CORNERS
        .iter()
        .map(|&position| SourceVertex {
            position,
            normal: position.map(|c| c / 3f32.sqrt()),
            groups: vec![],
        })
        .collect();

    let polygons = QUADS
        .iter()
        .map(|(corners, normal)| SourcePolygon {
            vertices: corners.to_vec(),
            smooth: false,
            material: 0,
            normal: *normal,
        })
        .collect();

    let uvs = (0..FACE_COUNT)
        .flat_map(|_| [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
        .collect();

    SourceMesh {
        name: "CubeMesh".into(),
        vertices,
        polygons,
        uvs: Some(uvs),
        materials: vec![],
    }
}

pub fn cube_scene() -> SceneDocument {
    let mut document = SceneDocument::new("CubeScene");
    let material = document.add_material(SourceMaterial {
        name: "Red".into(),
        ambient: 0.5,
        diffuse_color: [1.0, 0.0, 0.0],
        specular_color: [1.0, 1.0, 1.0],
        texture_slots: vec![TextureSlot {
            image: Some("textures/red.png".into()),
            use_map_normal: false,
            use_map_specular: false,
            use_map_color_diffuse: true,
            blend_type: Default::default(),
            factor: 1.0,
        }],
    });

    let mut mesh = cube_mesh();
    mesh.materials = vec![Some(material)];
    let mesh = document.add_mesh(mesh);

    let mut cube = SourceObject::new(CUBE_NAME, ObjectKind::Mesh);
    cube.mesh = Some(mesh);
    cube.selected = true;
    cube.transform = SourceTransform::from_location([0.0, 0.0, 2.0]);
    document.add_object(cube);
    document.world.ambient_color = [0.1, 0.1, 0.1];
    document
}
