//! Group partitioning of root collections.
//!
//! Each root goes to every group that declares it. Roots claimed by no group
//! are appended to the **first** group.
//!
//! # Known limitation
//!
//! The API has no query for "ungrouped" collections. A collection created
//! after the user record was fetched is absent from every group's member
//! list, so it lands in the first group until the next fetch. This mirrors
//! how the API itself behaves and is kept deliberately.

use crate::models::{CollectionGroup, CollectionItem, Group};

/// Assigns root collections to groups.
///
/// Output groups keep input order, and each group's items keep `roots`
/// order. Leftover roots follow the first group's own members. An empty
/// `groups` yields an empty result and the roots are dropped: an account
/// without groups has no collections to show.
#[must_use]
pub fn partition(roots: Vec<CollectionItem>, groups: Vec<Group>) -> Vec<CollectionGroup> {
    if groups.is_empty() {
        if !roots.is_empty() {
            tracing::warn!(
                unassigned = roots.len(),
                "No groups returned; root collections left unassigned"
            );
        }
        return Vec::new();
    }

    let mut partitioned: Vec<CollectionGroup> = groups
        .iter()
        .map(|g| CollectionGroup::empty(g.title.clone()))
        .collect();
    let mut leftovers = Vec::new();

    for root in roots {
        let claimants: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.claims(root.id))
            .map(|(idx, _)| idx)
            .collect();

        match claimants.split_last() {
            None => leftovers.push(root),
            Some((&last, rest)) => {
                for &idx in rest {
                    partitioned[idx].items.push(root.clone());
                }
                partitioned[last].items.push(root);
            },
        }
    }

    if !leftovers.is_empty() {
        tracing::debug!(
            count = leftovers.len(),
            group = %partitioned[0].title,
            "Appending ungrouped collections to first group"
        );
        partitioned[0].items.extend(leftovers);
    }

    partitioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectionId;

    fn roots(ids: &[CollectionId]) -> Vec<CollectionItem> {
        ids.iter()
            .map(|&id| CollectionItem::new(id, format!("c{id}")))
            .collect()
    }

    fn item_ids(group: &CollectionGroup) -> Vec<CollectionId> {
        group.items.iter().filter_map(|i| i.id).collect()
    }

    #[test]
    fn test_leftovers_go_to_first_group() {
        let groups = vec![Group::new("A", vec![1]), Group::new("B", vec![])];

        let result = partition(roots(&[1, 2, 3]), groups);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "A");
        assert_eq!(item_ids(&result[0]), vec![1, 2, 3]);
        assert!(result[1].items.is_empty());
    }

    #[test]
    fn test_members_follow_root_order_not_declaration_order() {
        let groups = vec![Group::new("A", vec![3, 1]), Group::new("B", vec![2])];

        let result = partition(roots(&[1, 2, 3]), groups);

        assert_eq!(item_ids(&result[0]), vec![1, 3]);
        assert_eq!(item_ids(&result[1]), vec![2]);
    }

    #[test]
    fn test_leftovers_after_first_group_members() {
        let groups = vec![Group::new("A", vec![4]), Group::new("B", vec![1])];

        let result = partition(roots(&[1, 2, 3, 4]), groups);

        assert_eq!(item_ids(&result[0]), vec![4, 2, 3]);
        assert_eq!(item_ids(&result[1]), vec![1]);
    }

    #[test]
    fn test_no_groups_returns_empty() {
        assert!(partition(roots(&[1, 2]), Vec::new()).is_empty());
    }

    #[test]
    fn test_no_roots_keeps_groups() {
        let result = partition(Vec::new(), vec![Group::new("A", vec![1])]);
        assert_eq!(result, vec![CollectionGroup::empty("A")]);
    }

    #[test]
    fn test_anonymous_root_is_ungrouped() {
        let anonymous = CollectionItem::default();
        let groups = vec![Group::new("A", vec![]), Group::new("B", vec![1])];

        let result = partition(vec![anonymous, CollectionItem::new(1, "one")], groups);

        assert_eq!(result[0].items.len(), 1);
        assert!(result[0].items[0].id.is_none());
        assert_eq!(item_ids(&result[1]), vec![1]);
    }

    #[test]
    fn test_root_claimed_twice_appears_in_both() {
        let groups = vec![Group::new("A", vec![1]), Group::new("B", vec![1])];

        let result = partition(roots(&[1]), groups);

        assert_eq!(item_ids(&result[0]), vec![1]);
        assert_eq!(item_ids(&result[1]), vec![1]);
    }

    #[test]
    fn test_subtrees_travel_with_roots() {
        let mut root = CollectionItem::new(1, "root");
        root.children.push(CollectionItem::new(2, "child"));

        let result = partition(vec![root], vec![Group::new("A", vec![1])]);

        assert_eq!(result[0].collection_count(), 2);
    }
}
