//! The authenticated user.

use super::Group;
use serde::{Deserialize, Serialize};

/// The account that owns the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Remote identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Full display name.
    #[serde(rename = "fullName", default)]
    pub full_name: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Public user name.
    #[serde(default)]
    pub name: String,

    /// Whether the account has a paid subscription.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro: Option<bool>,

    /// Collection groups in sidebar order.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl User {
    /// Finds the first group with exactly the given title.
    #[must_use]
    pub fn group(&self, title: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup() {
        let json = r#"{
            "_id": 32,
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "name": "jane",
            "groups": [
                {"title": "Work", "collections": [1]},
                {"title": "Home", "collections": [2]}
            ]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.full_name, "Jane Doe");
        assert_eq!(user.group("Home").map(|g| g.collections.clone()), Some(vec![2]));
        assert!(user.group("home").is_none());
    }
}
