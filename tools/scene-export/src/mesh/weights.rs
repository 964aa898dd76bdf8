//! Vertex group weights to bone influences

use hashbrown::HashMap;

use crate::model::MAX_INFLUENCES;
use crate::source::GroupWeight;

/// Vertex group index to bone index
pub type BoneMap = HashMap<u32, i32>;

/// Bone influences of one vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Influences {
    pub weights: [f32; MAX_INFLUENCES],
    pub bones: [i32; MAX_INFLUENCES],
    /// Influences beyond the strongest four that were discarded
    pub dropped: usize,
}

impl Influences {
    pub const NONE: Self = Self {
        weights: [0.0; MAX_INFLUENCES],
        bones: [-1; MAX_INFLUENCES],
        dropped: 0,
    };
}

/// Build a bone map by matching vertex group names against bone names.
///
/// Each bone, in armature order, claims the first vertex group with the same
/// name. Groups that match no bone stay unmapped.
pub fn bone_map<'a>(
    vertex_groups: &[String],
    bone_names: impl IntoIterator<Item = &'a str>,
) -> BoneMap {
    let mut map = BoneMap::new();
    for (bone, name) in bone_names.into_iter().enumerate() {
        if let Some(group) = vertex_groups.iter().position(|g| g == name) {
            map.insert(group as u32, bone as i32);
        }
    }
    map
}

/// Keep the strongest mapped influences of a vertex and normalize them.
///
/// Groups without a bone and non-positive weights are ignored. Ties keep the
/// order the groups were listed in.
pub fn extract_weights(groups: &[GroupWeight], bones: &BoneMap) -> Influences {
    let mut candidates: Vec<(i32, f32)> = groups
        .iter()
        .filter(|g| g.weight > 0.0)
        .filter_map(|g| bones.get(&g.group).map(|&bone| (bone, g.weight)))
        .collect();
    if candidates.is_empty() {
        return Influences::NONE;
    }

    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    let dropped = candidates.len().saturating_sub(MAX_INFLUENCES);
    candidates.truncate(MAX_INFLUENCES);

    let total: f32 = candidates.iter().map(|(_, w)| w).sum();
    let mut influences = Influences {
        dropped,
        ..Influences::NONE
    };
    for (slot, (bone, weight)) in candidates.into_iter().enumerate() {
        influences.bones[slot] = bone;
        influences.weights[slot] = weight / total;
    }
    influences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gw(group: u32, weight: f32) -> GroupWeight {
        GroupWeight { group, weight }
    }

    fn identity_map(n: u32) -> BoneMap {
        (0..n).map(|i| (i, i as i32)).collect()
    }

    #[test]
    fn test_no_groups_is_unskinned() {
        let inf = extract_weights(&[], &identity_map(4));
        assert_eq!(inf, Influences::NONE);
    }

    #[test]
    fn test_single_influence_normalized() {
        let inf = extract_weights(&[gw(0, 0.25)], &identity_map(1));
        assert_eq!(inf.bones, [0, -1, -1, -1]);
        assert_eq!(inf.weights, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_keeps_strongest_four() {
        let groups = [gw(0, 0.1), gw(1, 0.5), gw(2, 0.2), gw(3, 0.9), gw(4, 0.3)];
        let inf = extract_weights(&groups, &identity_map(5));
        assert_eq!(inf.bones, [3, 1, 4, 2]);
        assert_eq!(inf.dropped, 1);
        let sum: f32 = inf.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(inf.weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_unmapped_and_zero_weights_ignored() {
        let mut map = BoneMap::new();
        map.insert(1, 7);
        let inf = extract_weights(&[gw(0, 0.8), gw(1, 0.4), gw(2, 0.0)], &map);
        assert_eq!(inf.bones, [7, -1, -1, -1]);
        assert_eq!(inf.weights[0], 1.0);
    }

    #[test]
    fn test_weight_sum_is_one_for_any_mapped_vertex() {
        let map = identity_map(6);
        for n in 1..=6u32 {
            let groups: Vec<_> = (0..n).map(|g| gw(g, 0.1 * (g + 1) as f32)).collect();
            let inf = extract_weights(&groups, &map);
            let sum: f32 = inf.weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "n={n} sum={sum}");
            let used = inf.bones.iter().filter(|&&b| b >= 0).count();
            assert_eq!(used, (n as usize).min(MAX_INFLUENCES));
        }
    }

    #[test]
    fn test_bone_map_matches_names() {
        let groups = vec!["Spine".to_string(), "Unrelated".to_string(), "Hip".to_string()];
        let map = bone_map(&groups, ["Hip", "Spine", "Head"]);
        assert_eq!(map.get(&2), Some(&0));
        assert_eq!(map.get(&0), Some(&1));
        assert_eq!(map.get(&1), None);
        assert_eq!(map.len(), 2);
    }
}
