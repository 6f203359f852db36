//! Raindrop (bookmark) records and request bodies.

use super::{CollectionId, ParentRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a raindrop.
pub type RaindropId = i64;

/// A saved bookmark as returned by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RaindropItem {
    /// Remote identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RaindropId>,

    /// Bookmarked URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description or page excerpt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// User note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Marked as favorite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    /// Owning collection reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<ParentRef>,

    /// Owning collection identity (flattened form).
    #[serde(
        rename = "collectionId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_id: Option<CollectionId>,

    /// Domain of the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Content type (`link`, `article`, `image`, `video`, `document`, `audio`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

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
}

/// Parser hint sent with create requests so the API fetches title and excerpt.
#[must_use]
pub fn parse_hint() -> Value {
    serde_json::json!({ "weight": 1 })
}

/// Request body for creating a raindrop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaindropCreate {
    /// URL to save.
    pub link: String,

    /// Target collection (unsorted when absent).
    #[serde(rename = "collectionId", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<CollectionId>,

    /// Tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Favorite flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    /// Asks the API to parse the page in the background.
    #[serde(rename = "pleaseParse")]
    pub please_parse: Value,
}

impl RaindropCreate {
    /// Creates a request for the given link with background parsing enabled.
    #[must_use]
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            collection_id: None,
            tags: None,
            important: None,
            please_parse: parse_hint(),
        }
    }
}

/// Request body for updating a single raindrop. Unset fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaindropUpdate {
    /// New URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Favorite flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    /// Destination collection.
    #[serde(rename = "collectionId", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<CollectionId>,

    /// Re-parse request, set only when the link changes.
    #[serde(rename = "pleaseParse", skip_serializing_if = "Option::is_none")]
    pub please_parse: Option<Value>,
}

impl RaindropUpdate {
    /// Update that only moves the raindrop.
    #[must_use]
    pub fn moved_to(collection_id: CollectionId) -> Self {
        Self {
            collection_id: Some(collection_id),
            ..Self::default()
        }
    }
}

/// Request body for bulk updates within a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RaindropsUpdate {
    /// Restrict the update to these raindrops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<RaindropId>>,

    /// Favorite flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    /// Tags to append; an empty list clears all tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Destination collection.
    #[serde(rename = "collectionId", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<CollectionId>,
}

/// Query parameters for listing raindrops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaindropQuery {
    /// Search expression (`#tag`, `"exact phrase"`, words).
    pub search: Option<String>,
    /// Zero-based page.
    pub page: Option<u32>,
    /// Items per page (API maximum 50).
    pub perpage: Option<u32>,
    /// Include raindrops from nested collections.
    pub nested: bool,
}

impl RaindropQuery {
    /// Renders the query as URL parameters, omitting unset values.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("nested", self.nested.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(perpage) = self.perpage {
            params.push(("perpage", perpage.to_string()));
        }
        params
    }
}
