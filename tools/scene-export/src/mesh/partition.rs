//! Material partitioning and merging of identical partitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Face;

use super::triangulate::Triangle;

/// How partitions with identical faces are merged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Single pass: an unmerged partition absorbs the first later unmerged
    /// match. Partitions take part in at most one merge.
    #[default]
    FirstMatch,
    /// Each partition absorbs every later surviving match
    Transitive,
}

/// Face equality used when merging partitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceCompare {
    /// Faces match when all three indices are equal
    #[default]
    Exact,
    /// Historical comparator: first index equal, second and third different
    Legacy,
}

/// Faces sharing a material slot set
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Partition {
    pub name: String,
    pub faces: Vec<Face>,
    pub slots: Vec<u32>,
}

/// Group triangles by material slot, in ascending slot order.
///
/// Partitions are named `<mesh>_<n>` in creation order.
pub(crate) fn partition_by_slot(mesh_name: &str, triangles: &[Triangle]) -> Vec<Partition> {
    let mut by_slot: BTreeMap<u32, Vec<Face>> = BTreeMap::new();
    for triangle in triangles {
        by_slot.entry(triangle.slot).or_default().push(triangle.face);
    }

    by_slot
        .into_iter()
        .enumerate()
        .map(|(n, (slot, faces))| Partition {
            name: format!("{}_{}", mesh_name, n),
            faces,
            slots: vec![slot],
        })
        .collect()
}

fn faces_match(a: &[Face], b: &[Face], compare: FaceCompare) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(fa, fb)| fa.matches(fb, compare))
}

/// Merge partitions whose face lists match, concatenating their material
/// slots into the surviving partition.
pub(crate) fn merge_identical(
    partitions: Vec<Partition>,
    policy: MergePolicy,
    compare: FaceCompare,
) -> Vec<Partition> {
    let mut slots: Vec<Option<Partition>> = partitions.into_iter().map(Some).collect();
    let first_match = policy == MergePolicy::FirstMatch;
    let mut merged = vec![false; slots.len()];

    for i in 0..slots.len() {
        if slots[i].is_none() || (first_match && merged[i]) {
            continue;
        }
        for j in i + 1..slots.len() {
            if first_match && merged[j] {
                continue;
            }
            let matched = match (&slots[i], &slots[j]) {
                (Some(a), Some(b)) => faces_match(&a.faces, &b.faces, compare),
                _ => false,
            };
            if !matched {
                continue;
            }

            if let Some(absorbed) = slots[j].take() {
                if let Some(survivor) = slots[i].as_mut() {
                    survivor.slots.extend(absorbed.slots);
                }
            }
            merged[i] = true;
            merged[j] = true;
            if first_match {
                break;
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(face: [u32; 3], slot: u32) -> Triangle {
        Triangle { face: Face(face), slot }
    }

    fn part(name: &str, faces: &[[u32; 3]], slot: u32) -> Partition {
        Partition {
            name: name.into(),
            faces: faces.iter().map(|&f| Face(f)).collect(),
            slots: vec![slot],
        }
    }

    #[test]
    fn test_partition_orders_by_slot() {
        let tris = [tri([0, 1, 2], 2), tri([2, 3, 4], 0), tri([4, 5, 6], 2)];
        let parts = partition_by_slot("Cube", &tris);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "Cube_0");
        assert_eq!(parts[0].slots, vec![0]);
        assert_eq!(parts[1].name, "Cube_1");
        assert_eq!(parts[1].faces, vec![Face([0, 1, 2]), Face([4, 5, 6])]);
    }

    #[test]
    fn test_distinct_partitions_are_kept() {
        let parts = vec![part("m_0", &[[0, 1, 2]], 0), part("m_1", &[[3, 4, 5]], 1)];
        let merged = merge_identical(parts.clone(), MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(merged, parts);
    }

    #[test]
    fn test_identical_pair_merges() {
        let parts = vec![part("m_0", &[[0, 1, 2]], 0), part("m_1", &[[0, 1, 2]], 1)];
        let merged = merge_identical(parts, MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "m_0");
        assert_eq!(merged[0].slots, vec![0, 1]);
    }

    #[test]
    fn test_three_identical_first_match_vs_transitive() {
        let parts = vec![
            part("m_0", &[[0, 1, 2]], 0),
            part("m_1", &[[0, 1, 2]], 1),
            part("m_2", &[[0, 1, 2]], 2),
        ];

        let first = merge_identical(parts.clone(), MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "m_0");
        assert_eq!(first[0].slots, vec![0, 1]);
        assert_eq!(first[1].name, "m_2");
        assert_eq!(first[1].slots, vec![2]);

        let transitive = merge_identical(parts, MergePolicy::Transitive, FaceCompare::Exact);
        assert_eq!(transitive.len(), 1);
        assert_eq!(transitive[0].name, "m_0");
        assert_eq!(transitive[0].slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_match_pairs_up_four_identical() {
        let parts: Vec<Partition> = (0..4)
            .map(|n| part(&format!("m_{}", n), &[[0, 1, 2]], n))
            .collect();
        let first = merge_identical(parts, MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].slots, vec![0, 1]);
        assert_eq!(first[1].name, "m_2");
        assert_eq!(first[1].slots, vec![2, 3]);
    }

    #[test]
    fn test_first_match_merges_independent_pairs() {
        let parts = vec![
            part("m_0", &[[0, 1, 2]], 0),
            part("m_1", &[[0, 1, 2]], 1),
            part("m_2", &[[3, 4, 5]], 2),
            part("m_3", &[[3, 4, 5]], 3),
        ];
        let first = merge_identical(parts, MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].slots, vec![0, 1]);
        assert_eq!(first[1].slots, vec![2, 3]);
    }

    #[test]
    fn test_legacy_compare_merges_differing_faces() {
        let parts = vec![part("m_0", &[[0, 1, 2]], 0), part("m_1", &[[0, 5, 6]], 1)];
        let legacy = merge_identical(parts.clone(), MergePolicy::FirstMatch, FaceCompare::Legacy);
        assert_eq!(legacy.len(), 1);

        let exact = merge_identical(parts, MergePolicy::FirstMatch, FaceCompare::Exact);
        assert_eq!(exact.len(), 2);
    }

    #[test]
    fn test_different_lengths_never_match() {
        let parts = vec![
            part("m_0", &[[0, 1, 2]], 0),
            part("m_1", &[[0, 1, 2], [0, 1, 2]], 1),
        ];
        let merged = merge_identical(parts, MergePolicy::Transitive, FaceCompare::Exact);
        assert_eq!(merged.len(), 2);
    }
}
