//! Collection records.
//!
//! A collection is a user-defined folder of raindrops. The API reports the
//! nesting of collections only as a `parent` back-reference on each record;
//! the `children` field is filled in by [`crate::services::build_forest`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a collection as assigned by the remote API.
pub type CollectionId = i64;

/// System collection holding every raindrop (used by stats and search).
pub const ALL_COLLECTION_ID: CollectionId = 0;

/// System collection for raindrops not filed anywhere.
pub const UNSORTED_COLLECTION_ID: CollectionId = -1;

/// System collection for deleted raindrops.
pub const TRASH_COLLECTION_ID: CollectionId = -99;

/// Returns `true` for the ids the API reserves for system collections.
#[must_use]
pub const fn is_system_collection(id: CollectionId) -> bool {
    matches!(
        id,
        ALL_COLLECTION_ID | UNSORTED_COLLECTION_ID | TRASH_COLLECTION_ID
    )
}

/// Reference to another record, serialized as `{"$id": <int>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParentRef {
    /// Referenced identity. Absent when the API sends an empty object.
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CollectionId>,
}

impl ParentRef {
    /// Creates a reference to the given identity.
    #[must_use]
    pub const fn new(id: CollectionId) -> Self {
        Self { id: Some(id) }
    }
}

/// A node in the collection forest.
///
/// Descriptive attributes are opaque to tree reconstruction; only `id` and
/// `parent` take part in it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Remote identity. Absent for records not yet persisted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CollectionId>,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Number of raindrops directly inside the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Manual sort position among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,

    /// Legacy ordering field still returned by some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    /// Whether the collection is publicly shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,

    /// Whether the collection is expanded in the web UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    /// View mode (`list`, `simple`, `grid`, `masonry`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,

    /// Parent collection, absent for top-level collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(
        rename = "lastUpdate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<DateTime<Utc>>,

    /// Nested collections, populated only by tree reconstruction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

impl CollectionItem {
    /// Creates a top-level collection record with an identity and a title.
    #[must_use]
    pub fn new(id: CollectionId, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the parent reference.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: CollectionId) -> Self {
        self.parent = Some(ParentRef::new(parent_id));
        self
    }

    /// Sets the raindrop count.
    #[must_use]
    pub const fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Returns the referenced parent identity, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<CollectionId> {
        self.parent.and_then(|p| p.id)
    }

    /// Counts this record and every descendant.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// Collects the identities of this record and every descendant, depth first.
    pub fn collect_ids(&self, out: &mut Vec<Option<CollectionId>>) {
        out.push(self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// Request body for creating or updating a collection.
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionPayload {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New parent identity.
    #[serde(rename = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CollectionId>,

    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

impl CollectionPayload {
    /// Payload that only changes the title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Payload that only moves the collection.
    #[must_use]
    pub fn moved_to(parent_id: CollectionId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }
}
