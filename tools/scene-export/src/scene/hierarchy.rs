//! Entity parent resolution

use glam::Mat4;
use hashbrown::HashMap;

use crate::error::ExportError;
use crate::model::Entity;
use crate::source::{ObjectId, SceneSource};

/// Link every entity to its parent's entity and re-express its transform
/// relative to that parent.
///
/// Entities arrive holding world transforms. Only object, bone, and lattice
/// attachments create links; everything else stays a root. A parent that was
/// not exported as an entity is a fatal error.
pub(crate) fn resolve_hierarchy<S: SceneSource + ?Sized>(
    source: &S,
    entities: &mut [Entity],
    objects: &[ObjectId],
    entity_index: &HashMap<ObjectId, usize>,
) -> Result<(), ExportError> {
    let world: Vec<Mat4> = entities.iter().map(|e| e.spatial.transform).collect();

    for (index, &object_id) in objects.iter().enumerate() {
        let object = source
            .object(object_id)
            .ok_or(ExportError::UnknownObject(object_id))?;
        if !object.parent_kind.links_entities() {
            continue;
        }
        let Some(parent_id) = object.parent else {
            continue;
        };

        let Some(&parent) = entity_index.get(&parent_id) else {
            let parent_name = source
                .object(parent_id)
                .map_or_else(|| format!("{:?}", parent_id), |p| p.name.clone());
            return Err(ExportError::UnresolvedParent {
                object: object.name.clone(),
                parent: parent_name,
            });
        };

        let spatial = &mut entities[index].spatial;
        spatial.parent = parent as i32;
        spatial.transform = world[parent].inverse() * world[index];
    }
    Ok(())
}

/// True when following parent links from every entity reaches a root within
/// `entities.len()` steps
pub fn hierarchy_terminates(entities: &[Entity]) -> bool {
    entities.iter().all(|entity| {
        let mut current = entity.spatial.parent_index();
        for _ in 0..entities.len() {
            match current {
                None => return true,
                Some(i) => current = entities.get(i).and_then(|e| e.spatial.parent_index()),
            }
        }
        current.is_none()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ObjectKind, ParentKind, SceneDocument, SourceObject, SourceTransform};
    use glam::Vec3;

    fn doc_with_chain() -> (SceneDocument, Vec<ObjectId>) {
        let mut doc = SceneDocument::new("h");
        let mut a = SourceObject::new("A", ObjectKind::Other);
        a.transform = SourceTransform::from_location([1.0, 0.0, 0.0]);
        let a = doc.add_object(a);
        let mut b = SourceObject::new("B", ObjectKind::Other);
        b.parent = Some(a);
        b.transform = SourceTransform::from_location([0.0, 1.0, 0.0]);
        let b = doc.add_object(b);
        (doc, vec![a, b])
    }

    fn entities_for(
        doc: &SceneDocument,
        ids: &[ObjectId],
    ) -> (Vec<Entity>, HashMap<ObjectId, usize>) {
        let entities = ids
            .iter()
            .map(|&id| Entity::node(doc.object(id).unwrap().name.clone(), doc.world_transform(id)))
            .collect();
        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        (entities, index)
    }

    #[test]
    fn test_child_becomes_parent_relative() {
        let (doc, ids) = doc_with_chain();
        let (mut entities, index) = entities_for(&doc, &ids);
        resolve_hierarchy(&doc, &mut entities, &ids, &index).unwrap();

        assert_eq!(entities[0].spatial.parent, -1);
        assert_eq!(entities[1].spatial.parent, 0);
        let offset = entities[1].spatial.transform.transform_point3(Vec3::ZERO);
        assert!(offset.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
        assert!(hierarchy_terminates(&entities));
    }

    #[test]
    fn test_missing_parent_is_fatal() {
        let (doc, ids) = doc_with_chain();
        let (entities, _) = entities_for(&doc, &ids[1..]);
        let mut entities = entities;
        let index = [(ids[1], 0)].into_iter().collect();

        let err = resolve_hierarchy(&doc, &mut entities, &ids[1..], &index).unwrap_err();
        assert_eq!(
            err,
            ExportError::UnresolvedParent {
                object: "B".into(),
                parent: "A".into()
            }
        );
    }

    #[test]
    fn test_vertex_parent_stays_root() {
        let (mut doc, ids) = doc_with_chain();
        doc.object_mut(ids[1]).unwrap().parent_kind = ParentKind::Vertex;
        let (mut entities, index) = entities_for(&doc, &ids);
        resolve_hierarchy(&doc, &mut entities, &ids, &index).unwrap();
        assert_eq!(entities[1].spatial.parent, -1);
    }

    #[test]
    fn test_cycle_does_not_terminate() {
        let mut a = Entity::node("a", Mat4::IDENTITY);
        let mut b = Entity::node("b", Mat4::IDENTITY);
        a.spatial.parent = 1;
        b.spatial.parent = 0;
        assert!(!hierarchy_terminates(&[a, b]));
    }
}
