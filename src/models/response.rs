//! Response bodies of the REST API.
//!
//! Every response is wrapped in an envelope carrying `result: bool`; the
//! envelope is checked by the client before one of these bodies is decoded
//! from the same JSON object.

use super::{CollectionId, User};
use serde::Deserialize;

/// Body carrying a single record under `item`.
#[derive(Debug, Deserialize)]
pub struct ItemResponse<T> {
    /// The record.
    pub item: T,
}

/// Body carrying a list of records under `items`.
#[derive(Debug, Deserialize)]
pub struct ItemsResponse<T> {
    /// The records.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Body of `GET /user`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    /// The user.
    pub user: User,
}

/// Body of bulk update and delete endpoints.
#[derive(Debug, Deserialize)]
pub struct ModifiedResponse {
    /// Number of affected records.
    #[serde(default)]
    pub modified: u64,
}

/// One entry of `GET /user/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatItem {
    /// System collection id (0, -1, -99).
    #[serde(rename = "_id")]
    pub id: CollectionId,
    /// Raindrop count.
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectionItem;

    #[test]
    fn test_items_response_defaults_empty() {
        let body: ItemsResponse<CollectionItem> = serde_json::from_str(r#"{"result": true}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_stats_items() {
        let body: ItemsResponse<StatItem> = serde_json::from_str(
            r#"{"result": true, "items": [{"_id": 0, "count": 10}, {"_id": -1, "count": 3}]}"#,
        )
        .unwrap();
        assert_eq!(body.items[1], StatItem { id: -1, count: 3 });
    }
}
