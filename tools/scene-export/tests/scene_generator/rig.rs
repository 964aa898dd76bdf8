//! Two-bone rig: Root at the origin, Tip one unit up. A quad spanning both
//! bones is skinned to them. Clip "Bend" rotates Tip 90° about Z on frame 1.

use std::f32::consts::FRAC_1_SQRT_2;

use scene_export::source::{
    ClipFrame, ClipId, GroupWeight, ObjectId, ObjectKind, SourceArmature, SourceBone, SourceClip,
    SourceMesh, SourceObject, SourcePolygon, SourceTransform, SourceVertex,
};
use scene_export::SceneDocument;

pub const RIG_NAME: &str = "Rig";
pub const BODY_NAME: &str = "Body";
pub const CLIP_NAME: &str = "Bend";

/// 90° about Z as (w, x, y, z)
pub const QUARTER_TURN_Z: [f32; 4] = [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2];

pub struct RigScene {
    pub document: SceneDocument,
    pub rig: ObjectId,
    pub body: ObjectId,
    pub clip: ClipId,
}

pub fn rig_armature(bone_names: &[&str]) -> SourceArmature {
    let bones = bone_names
        .iter()
        .enumerate()
        .map(|(i, name)| SourceBone {
            name: name.to_string(),
            parent: i.checked_sub(1),
            rest: SourceTransform::from_location([0.0, i as f32, 0.0]),
            length: 1.0,
        })
        .collect();
    SourceArmature {
        name: "RigData".into(),
        bones,
    }
}

fn body_mesh() -> SourceMesh {
    let vertex = |position: [f32; 3], group: u32| SourceVertex {
        position,
        normal: [0.0, 0.0, 1.0],
        groups: vec![GroupWeight { group, weight: 1.0 }],
    };
    SourceMesh {
        name: "BodyMesh".into(),
        vertices: vec![
            vertex([-0.5, 0.0, 0.0], 0),
            vertex([0.5, 0.0, 0.0], 0),
            vertex([0.5, 1.0, 0.0], 1),
            vertex([-0.5, 1.0, 0.0], 1),
        ],
        polygons: vec![SourcePolygon {
            vertices: vec![0, 1, 2, 3],
            smooth: true,
            material: 0,
            normal: [0.0, 0.0, 1.0],
        }],
        uvs: None,
        materials: vec![None],
    }
}

/// Rig with bones `Root` and `Tip`
pub fn rig_scene() -> RigScene {
    rig_scene_with_bones(&["Root", "Tip"])
}

/// Rig whose bones are named `bone_names`, chained parent to child
pub fn rig_scene_with_bones(bone_names: &[&str]) -> RigScene {
    let mut document = SceneDocument::new("RigScene");
    let armature = document.add_armature(rig_armature(bone_names));

    let tip = bone_names[bone_names.len() - 1];
    let mut bent = ClipFrame::default();
    bent.bones.insert(
        tip.to_string(),
        SourceTransform {
            location: [0.0, (bone_names.len() - 1) as f32, 0.0],
            rotation: QUARTER_TURN_Z,
            scale: [1.0; 3],
        },
    );
    let clip = document.add_clip(SourceClip {
        name: CLIP_NAME.into(),
        frame_range: [0.0, 1.0],
        frames: vec![ClipFrame::default(), bent],
    });

    let mut rig = SourceObject::new(RIG_NAME, ObjectKind::Armature);
    rig.armature = Some(armature);
    rig.clip = Some(clip);
    rig.selected = true;
    let rig = document.add_object(rig);

    let mesh = document.add_mesh(body_mesh());
    let mut body = SourceObject::new(BODY_NAME, ObjectKind::Mesh);
    body.mesh = Some(mesh);
    body.skin = Some(rig);
    body.parent = Some(rig);
    body.vertex_groups = bone_names.iter().map(|n| n.to_string()).collect();
    let body = document.add_object(body);

    RigScene {
        document,
        rig,
        body,
        clip,
    }
}
