//! Collection groups.
//!
//! Groups are the user-ordered folders-of-folders shown in the Raindrop
//! sidebar. The API lists them on the user record, each naming the ids of
//! the top-level collections it contains. Membership is a back-reference,
//! not a tree edge.
//!
//! # Example
//!
//! ```rust
//! use raindrop_mcp::models::Group;
//!
//! let group = Group::new("Work", vec![10, 11]);
//! assert!(group.claims(Some(10)));
//! assert!(!group.claims(None));
//! ```

use super::{CollectionId, CollectionItem};
use serde::{Deserialize, Serialize};

/// A named partition of top-level collections, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Display name, also used as the partition key.
    pub title: String,

    /// Identities of the top-level collections this group declares.
    #[serde(default)]
    pub collections: Vec<CollectionId>,

    /// Whether the group is collapsed in the sidebar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// Sort position among groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
}

impl Group {
    /// Creates a group declaring the given member ids.
    #[must_use]
    pub fn new(title: impl Into<String>, collections: Vec<CollectionId>) -> Self {
        Self {
            title: title.into(),
            collections,
            hidden: None,
            sort: None,
        }
    }

    /// Returns `true` if the group declares the given identity as a member.
    ///
    /// A record without identity is never claimed.
    #[must_use]
    pub fn claims(&self, id: Option<CollectionId>) -> bool {
        id.is_some_and(|id| self.collections.contains(&id))
    }
}

/// A group after partitioning: the member id list is gone and the claimed
/// root collections (with their subtrees) are attached instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionGroup {
    /// Display name of the group.
    pub title: String,

    /// Root collections assigned to the group, in input order.
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

impl CollectionGroup {
    /// Creates an empty partition for the given group title.
    #[must_use]
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Total number of collections in the group, nested ones included.
    #[must_use]
    pub fn collection_count(&self) -> usize {
        self.items.iter().map(CollectionItem::subtree_len).sum()
    }
}
