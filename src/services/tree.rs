//! Collection tree reconstruction.
//!
//! The API returns collections as a flat list in which each record names its
//! parent. [`build_forest`] turns that list back into a forest of
//! [`CollectionItem`] roots with `children` filled in recursively.
//!
//! # Guarantees
//!
//! - **No loss**: every distinct record of the input appears in the output.
//! - **No duplication**: every record appears exactly once.
//! - **Last write wins**: a repeated identity replaces the earlier record but
//!   keeps the earlier record's position.
//! - **Fail open**: a dangling or self-referential parent makes the record a
//!   root. A longer cycle is cut at its first member in input order.
//!
//! Root order and `children` order both follow the merged input order.
//!
//! ```text
//! [10] [11 -> 10] [12 -> 99]        10
//!                            ==>    └── 11
//!                                   12          (99 not in batch)
//! ```

use crate::models::{CollectionId, CollectionItem};
use indexmap::IndexMap;

/// Key of the identity map. Records without identity cannot be merged or
/// referenced, so each gets a unique positional key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RecordKey {
    Id(CollectionId),
    Anonymous(usize),
}

/// Counters describing one reconstruction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestStats {
    /// Distinct records after identity merging.
    pub records: usize,
    /// Records placed at root level.
    pub roots: usize,
    /// Records placed under a parent.
    pub nested: usize,
    /// Records whose parent reference did not resolve (self-references included).
    pub dangling: usize,
    /// Cycles cut by promoting one member to root.
    pub cycles_broken: usize,
}

/// Builds a forest from flat collection records.
///
/// See the [module documentation](self) for the ordering and merge rules.
#[must_use]
pub fn build_forest<I>(records: I) -> Vec<CollectionItem>
where
    I: IntoIterator<Item = CollectionItem>,
{
    build_forest_with_stats(records).0
}

/// Builds a forest and reports what the pass had to repair.
#[must_use]
pub fn build_forest_with_stats<I>(records: I) -> (Vec<CollectionItem>, ForestStats)
where
    I: IntoIterator<Item = CollectionItem>,
{
    let merged = merge_by_identity(records);
    let mut stats = ForestStats {
        records: merged.len(),
        ..ForestStats::default()
    };

    let mut parents = resolve_parents(&merged, &mut stats);
    stats.cycles_broken = break_cycles(&mut parents);

    let count = parents.len();
    let mut child_index: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut root_index = Vec::new();
    for (idx, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => child_index[*p].push(idx),
            None => root_index.push(idx),
        }
    }
    stats.roots = root_index.len();
    stats.nested = count - root_index.len();

    // Breadth-first order puts every parent before its children, so walking
    // it backwards assembles each subtree after all of its descendants.
    let mut order = Vec::with_capacity(count);
    order.extend_from_slice(&root_index);
    let mut cursor = 0;
    while cursor < order.len() {
        let idx = order[cursor];
        order.extend_from_slice(&child_index[idx]);
        cursor += 1;
    }

    let mut pending: Vec<Option<CollectionItem>> = merged.into_values().map(Some).collect();
    let mut built: Vec<Option<CollectionItem>> = vec![None; count];
    for &idx in order.iter().rev() {
        let Some(mut node) = pending[idx].take() else {
            continue;
        };
        node.children = child_index[idx]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[idx] = Some(node);
    }

    let roots = root_index
        .iter()
        .filter_map(|&idx| built[idx].take())
        .collect();

    (roots, stats)
}

/// Builds the insertion-ordered identity map. Incoming `children` are
/// discarded: nesting is derived from parent references only.
pub(crate) fn merge_by_identity<I>(records: I) -> IndexMap<RecordKey, CollectionItem>
where
    I: IntoIterator<Item = CollectionItem>,
{
    let mut merged = IndexMap::new();
    for (position, mut record) in records.into_iter().enumerate() {
        record.children.clear();
        let key = record
            .id
            .map_or(RecordKey::Anonymous(position), RecordKey::Id);
        merged.insert(key, record);
    }
    merged
}

/// Maps every record to the index of its parent within the merged batch.
fn resolve_parents(
    merged: &IndexMap<RecordKey, CollectionItem>,
    stats: &mut ForestStats,
) -> Vec<Option<usize>> {
    merged
        .values()
        .map(|record| {
            let parent_id = record.parent_id()?;
            if record.id == Some(parent_id) {
                stats.dangling += 1;
                return None;
            }
            let resolved = merged.get_index_of(&RecordKey::Id(parent_id));
            if resolved.is_none() {
                stats.dangling += 1;
            }
            resolved
        })
        .collect()
}

/// Walk state of a node while looking for cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Cuts every parent cycle at its first member and returns how many were cut.
///
/// Each walk climbs parent links until it reaches a root, a node finished by
/// an earlier walk, or a node on its own path. The last case closes a cycle,
/// which is cut at its lowest index. Every node is walked once.
fn break_cycles(parents: &mut [Option<usize>]) -> usize {
    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut path = Vec::new();
    let mut broken = 0;

    for start in 0..parents.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        let mut cursor = Some(start);
        while let Some(node) = cursor {
            match marks[node] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(&first) = path.iter().skip_while(|&&n| n != node).min() {
                        parents[first] = None;
                        broken += 1;
                    }
                    break;
                },
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath;
                    path.push(node);
                    cursor = parents[node];
                },
            }
        }

        for node in path.drain(..) {
            marks[node] = Mark::Done;
        }
    }

    broken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: CollectionId) -> CollectionItem {
        CollectionItem::new(id, format!("c{id}"))
    }

    fn child(id: CollectionId, parent: CollectionId) -> CollectionItem {
        item(id).with_parent(parent)
    }

    fn ids(items: &[CollectionItem]) -> Vec<CollectionId> {
        items.iter().filter_map(|i| i.id).collect()
    }

    #[test]
    fn test_empty_input() {
        let (roots, stats) = build_forest_with_stats(Vec::new());
        assert!(roots.is_empty());
        assert_eq!(stats, ForestStats::default());
    }

    #[test]
    fn test_parent_child_and_dangling() {
        let roots = build_forest(vec![item(10), child(11, 10), child(12, 99)]);

        assert_eq!(ids(&roots), vec![10, 12]);
        assert_eq!(ids(&roots[0].children), vec![11]);
        assert!(roots[1].children.is_empty());
    }

    #[test]
    fn test_child_listed_before_parent() {
        let roots = build_forest(vec![child(11, 10), item(10)]);

        assert_eq!(ids(&roots), vec![10]);
        assert_eq!(ids(&roots[0].children), vec![11]);
    }

    #[test]
    fn test_children_follow_input_order() {
        let roots = build_forest(vec![child(12, 10), item(10), child(11, 10)]);

        assert_eq!(ids(&roots[0].children), vec![12, 11]);
    }

    #[test]
    fn test_multi_level_chain() {
        let roots = build_forest(vec![child(3, 2), child(2, 1), item(1)]);

        assert_eq!(ids(&roots), vec![1]);
        assert_eq!(ids(&roots[0].children), vec![2]);
        assert_eq!(ids(&roots[0].children[0].children), vec![3]);
        assert_eq!(roots[0].subtree_len(), 3);
    }

    #[test]
    fn test_self_reference_becomes_root() {
        let (roots, stats) = build_forest_with_stats(vec![child(5, 5), child(6, 5)]);

        assert_eq!(ids(&roots), vec![5]);
        assert_eq!(ids(&roots[0].children), vec![6]);
        assert_eq!(stats.dangling, 1);
        assert_eq!(stats.cycles_broken, 0);
    }

    #[test]
    fn test_two_cycle_cut_at_first_member() {
        let (roots, stats) = build_forest_with_stats(vec![child(1, 2), child(2, 1), child(3, 1)]);

        assert_eq!(ids(&roots), vec![1]);
        assert_eq!(ids(&roots[0].children), vec![2, 3]);
        assert_eq!(stats.cycles_broken, 1);
        assert_eq!(stats.records, 3);
    }

    #[test]
    fn test_long_cycle_with_tail() {
        // 4 hangs off a 1 -> 2 -> 3 -> 1 cycle and is processed first.
        let roots = build_forest(vec![child(4, 1), child(1, 2), child(2, 3), child(3, 1)]);

        assert_eq!(ids(&roots), vec![1]);
        let mut all = Vec::new();
        roots[0].collect_ids(&mut all);
        assert_eq!(all.len(), 4);
        assert_eq!(ids(&roots[0].children), vec![4, 3]);
    }

    #[test]
    fn test_cycle_entered_away_from_lowest_member() {
        // The walk from 5 enters the 2 -> 3 -> 4 -> 2 cycle at 4; 2 is cut.
        let (roots, stats) =
            build_forest_with_stats(vec![item(1), child(5, 4), child(2, 3), child(3, 4), child(4, 2)]);

        assert_eq!(stats.cycles_broken, 1);
        assert_eq!(ids(&roots), vec![1, 2]);
        let mut all = Vec::new();
        roots[1].collect_ids(&mut all);
        assert_eq!(all, vec![Some(2), Some(4), Some(5), Some(3)]);
    }

    #[test]
    fn test_break_cycles_on_long_chain_and_long_cycle() {
        const LEN: usize = 200_000;
        // Chain 0 -> 1 -> ... -> LEN - 1 (root), walked from its deepest end,
        // followed by one cycle through every index of a second block.
        let mut parents: Vec<Option<usize>> = (1..=LEN).map(Some).collect();
        parents[LEN - 1] = None;
        parents.extend((LEN..2 * LEN).map(|idx| Some(if idx == 2 * LEN - 1 { LEN } else { idx + 1 })));

        assert_eq!(break_cycles(&mut parents), 1);
        assert_eq!(parents[LEN], None);
        assert_eq!(parents.iter().filter(|p| p.is_none()).count(), 2);
        assert_eq!(parents[0], Some(1));
    }

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let mut renamed = item(2);
        renamed.title = Some("renamed".to_string());

        let roots = build_forest(vec![item(1), item(2), item(3), renamed]);

        assert_eq!(ids(&roots), vec![1, 2, 3]);
        assert_eq!(roots[1].title.as_deref(), Some("renamed"));
    }

    #[test]
    fn test_later_batch_can_reparent() {
        // Root listing says 3 is top level; child listing places it under 1.
        let roots = build_forest(vec![item(1), item(3), child(3, 1)]);

        assert_eq!(ids(&roots), vec![1]);
        assert_eq!(ids(&roots[0].children), vec![3]);
    }

    #[test]
    fn test_records_without_identity_are_kept_as_roots() {
        let anonymous = CollectionItem {
            title: Some("draft".to_string()),
            ..CollectionItem::default()
        };
        let (roots, stats) =
            build_forest_with_stats(vec![anonymous.clone(), item(1), anonymous]);

        assert_eq!(roots.len(), 3);
        assert_eq!(stats.records, 3);
        assert!(roots[0].id.is_none());
        assert!(roots[2].id.is_none());
    }

    #[test]
    fn test_prefilled_children_are_discarded() {
        let mut parent = item(1);
        parent.children.push(item(2));

        let roots = build_forest(vec![parent, item(2)]);

        assert_eq!(ids(&roots), vec![1, 2]);
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn test_stats() {
        let (_, stats) =
            build_forest_with_stats(vec![item(10), child(11, 10), child(12, 99), child(13, 11)]);

        assert_eq!(
            stats,
            ForestStats {
                records: 4,
                roots: 2,
                nested: 2,
                dangling: 1,
                cycles_broken: 0,
            }
        );
    }

    #[test]
    fn test_deep_chain() {
        let mut records = vec![item(0)];
        records.extend((1..1_000).map(|id| child(id, id - 1)));

        let (roots, stats) = build_forest_with_stats(records);

        assert_eq!(roots.len(), 1);
        assert_eq!(stats.nested, 999);
        let mut depth = 0;
        let mut node = &roots[0];
        while let Some(next) = node.children.first() {
            depth += 1;
            node = next;
        }
        assert_eq!(depth, 999);
    }
}
