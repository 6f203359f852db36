//! Tags.

use serde::{Deserialize, Serialize};

/// A tag with its usage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (the API uses the name as identity).
    #[serde(rename = "_id")]
    pub name: String,

    /// Number of raindrops carrying the tag.
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tag() {
        let tag: Tag = serde_json::from_str(r#"{"_id": "rust", "count": 4}"#).unwrap();
        assert_eq!(tag.name, "rust");
        assert_eq!(tag.count, 4);
    }

    #[test]
    fn test_missing_count_defaults_zero() {
        let tag: Tag = serde_json::from_str(r#"{"_id": "idle"}"#).unwrap();
        assert_eq!(tag.count, 0);
    }
}
