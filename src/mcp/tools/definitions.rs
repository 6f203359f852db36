//! Tool definitions for MCP tools.
//!
//! Contains the JSON Schema definitions for all raindrop tools.

use super::ToolDefinition;
use serde_json::{Value, json};

/// Returns every tool in listing order.
pub fn all_tools() -> Vec<ToolDefinition> {
    vec![
        get_user_tool(),
        get_total_raindrops_tool(),
        get_groups_tool(),
        get_group_tool(),
        get_root_collections_tool(),
        get_collections_tool(),
        get_collection_tool(),
        create_collection_tool(),
        update_collection_tool(),
        move_collection_tool(),
        delete_collection_tool(),
        delete_collections_tool(),
        get_raindrop_tool(),
        get_raindrops_tool(),
        create_raindrop_tool(),
        update_raindrop_tool(),
        update_raindrops_tool(),
        move_raindrop_tool(),
        move_raindrops_tool(),
        delete_raindrop_tool(),
        delete_raindrops_tool(),
        get_tags_tool(),
        rename_tag_tool(),
        merge_tags_tool(),
        delete_tags_tool(),
    ]
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn no_arguments() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

fn collection_id(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

fn id_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "integer" },
        "minItems": 1,
        "description": description
    })
}

fn tag_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string", "minLength": 1 },
        "description": description
    })
}

fn search() -> Value {
    json!({
        "type": "string",
        "description": "Search expression: words, \"exact phrase\", #tag, -exclude"
    })
}

fn nested() -> Value {
    json!({
        "type": "boolean",
        "description": "Include raindrops from nested collections (default: false)",
        "default": false
    })
}

/// Defines the user tool.
pub fn get_user_tool() -> ToolDefinition {
    tool(
        "raindrop_get_user",
        "Get the current user's information from Raindrop.io",
        no_arguments(),
    )
}

/// Defines the raindrop count tool.
pub fn get_total_raindrops_tool() -> ToolDefinition {
    tool(
        "raindrop_get_total_raindrops",
        "Count the raindrops in a collection",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id(
                    "Collection to count (0 for all, -1 for unsorted, -99 for trash). Default: 0"
                )
            },
            "additionalProperties": false
        }),
    )
}

/// Defines the groups tool.
pub fn get_groups_tool() -> ToolDefinition {
    tool(
        "raindrop_get_groups",
        "Get the collection groups of the current user in sidebar order",
        no_arguments(),
    )
}

/// Defines the single group tool.
pub fn get_group_tool() -> ToolDefinition {
    tool(
        "raindrop_get_group",
        "Get a specific group by name",
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Exact title of the group"
                }
            },
            "required": ["name"],
            "additionalProperties": false
        }),
    )
}

/// Defines the root collections tool.
pub fn get_root_collections_tool() -> ToolDefinition {
    tool(
        "raindrop_get_root_collections",
        "Get the top-level collections of the current user, grouped by sidebar group",
        no_arguments(),
    )
}

/// Defines the collection tree tool.
pub fn get_collections_tool() -> ToolDefinition {
    tool(
        "raindrop_get_collections",
        "Get all collections as a tree grouped by sidebar group (use this before creating a collection or raindrop)",
        no_arguments(),
    )
}

/// Defines the single collection tool.
pub fn get_collection_tool() -> ToolDefinition {
    tool(
        "raindrop_get_collection",
        "Get a specific collection by ID",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("ID of the collection to retrieve")
            },
            "required": ["collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the collection creation tool.
pub fn create_collection_tool() -> ToolDefinition {
    tool(
        "raindrop_create_collection",
        "Create a new collection",
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Title of the new collection"
                },
                "parent_id": collection_id("Parent collection ID; omit for a top-level collection")
            },
            "required": ["title"],
            "additionalProperties": false
        }),
    )
}

/// Defines the collection rename tool.
pub fn update_collection_tool() -> ToolDefinition {
    tool(
        "raindrop_update_collection",
        "Rename an existing collection",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("ID of the collection to update"),
                "title": {
                    "type": "string",
                    "minLength": 1,
                    "description": "New title"
                }
            },
            "required": ["collection_id", "title"],
            "additionalProperties": false
        }),
    )
}

/// Defines the collection move tool.
pub fn move_collection_tool() -> ToolDefinition {
    tool(
        "raindrop_move_collection",
        "Move a collection under another collection",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("ID of the collection to move"),
                "parent_id": collection_id("ID of the new parent collection")
            },
            "required": ["collection_id", "parent_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the collection delete tool.
pub fn delete_collection_tool() -> ToolDefinition {
    tool(
        "raindrop_delete_collection",
        "Delete a collection; its raindrops move to the trash",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("ID of the collection to delete")
            },
            "required": ["collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the bulk collection delete tool.
pub fn delete_collections_tool() -> ToolDefinition {
    tool(
        "raindrop_delete_collections",
        "Bulk delete collections",
        json!({
            "type": "object",
            "properties": {
                "collection_ids": id_list("IDs of the collections to delete")
            },
            "required": ["collection_ids"],
            "additionalProperties": false
        }),
    )
}

/// Defines the single raindrop tool.
pub fn get_raindrop_tool() -> ToolDefinition {
    tool(
        "raindrop_get_raindrop",
        "Get a specific raindrop by ID",
        json!({
            "type": "object",
            "properties": {
                "raindrop_id": { "type": "integer", "description": "ID of the raindrop" }
            },
            "required": ["raindrop_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the raindrop listing tool.
pub fn get_raindrops_tool() -> ToolDefinition {
    tool(
        "raindrop_get_raindrops",
        "List or search raindrops in a collection",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id(
                    "Collection to list (0 for all, -1 for unsorted, -99 for trash). Default: 0"
                ),
                "search": search(),
                "page": { "type": "integer", "minimum": 0, "description": "Zero-based page" },
                "perpage": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 50,
                    "description": "Items per page (max 50)"
                },
                "nested": nested()
            },
            "additionalProperties": false
        }),
    )
}

/// Defines the raindrop creation tool.
pub fn create_raindrop_tool() -> ToolDefinition {
    tool(
        "raindrop_create_raindrop",
        "Save a new raindrop (bookmark); title and excerpt are parsed from the page",
        json!({
            "type": "object",
            "properties": {
                "link": { "type": "string", "minLength": 1, "description": "URL to save" },
                "collection_id": collection_id("Target collection; omit for unsorted"),
                "tags": tag_list("Tags for the raindrop"),
                "important": { "type": "boolean", "description": "Mark as favorite" }
            },
            "required": ["link"],
            "additionalProperties": false
        }),
    )
}

/// Defines the raindrop update tool.
pub fn update_raindrop_tool() -> ToolDefinition {
    tool(
        "raindrop_update_raindrop",
        "Update an existing raindrop; omitted fields are left unchanged",
        json!({
            "type": "object",
            "properties": {
                "raindrop_id": { "type": "integer", "description": "ID of the raindrop" },
                "link": { "type": "string", "minLength": 1, "description": "New URL" },
                "tags": tag_list("Replacement tag list"),
                "important": { "type": "boolean", "description": "Mark as favorite" }
            },
            "required": ["raindrop_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the bulk raindrop update tool.
pub fn update_raindrops_tool() -> ToolDefinition {
    tool(
        "raindrop_update_raindrops",
        "Bulk update raindrops in a collection, optionally filtered by IDs or search",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("Collection containing the raindrops"),
                "raindrop_ids": id_list("Restrict the update to these raindrops"),
                "tags": tag_list("Tags to append; an empty list removes all tags"),
                "important": { "type": "boolean", "description": "Mark as favorite" },
                "search": search(),
                "nested": nested()
            },
            "required": ["collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the raindrop move tool.
pub fn move_raindrop_tool() -> ToolDefinition {
    tool(
        "raindrop_move_raindrop",
        "Move a raindrop to another collection",
        json!({
            "type": "object",
            "properties": {
                "raindrop_id": { "type": "integer", "description": "ID of the raindrop" },
                "collection_id": collection_id("Destination collection")
            },
            "required": ["raindrop_id", "collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the bulk raindrop move tool.
pub fn move_raindrops_tool() -> ToolDefinition {
    tool(
        "raindrop_move_raindrops",
        "Move raindrops from one collection to another, optionally filtered by IDs or search",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("Source collection"),
                "target_collection_id": collection_id("Destination collection"),
                "search": search(),
                "raindrop_ids": id_list("Restrict the move to these raindrops"),
                "nested": nested()
            },
            "required": ["collection_id", "target_collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the raindrop delete tool.
pub fn delete_raindrop_tool() -> ToolDefinition {
    tool(
        "raindrop_delete_raindrop",
        "Delete a raindrop; it moves to the trash unless permanent is set",
        json!({
            "type": "object",
            "properties": {
                "raindrop_id": { "type": "integer", "description": "ID of the raindrop" },
                "permanent": {
                    "type": "boolean",
                    "default": false,
                    "description": "Also remove it from the trash"
                }
            },
            "required": ["raindrop_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the bulk raindrop delete tool.
pub fn delete_raindrops_tool() -> ToolDefinition {
    tool(
        "raindrop_delete_raindrops",
        "Bulk delete raindrops in a collection, optionally filtered by IDs or search",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("Collection containing the raindrops"),
                "search": search(),
                "raindrop_ids": id_list("Restrict the delete to these raindrops"),
                "permanent": {
                    "type": "boolean",
                    "default": false,
                    "description": "Also remove them from the trash"
                }
            },
            "required": ["collection_id"],
            "additionalProperties": false
        }),
    )
}

/// Defines the tag listing tool.
pub fn get_tags_tool() -> ToolDefinition {
    tool(
        "raindrop_get_tags",
        "List tags with usage counts",
        json!({
            "type": "object",
            "properties": {
                "collection_id": collection_id("Collection to list tags for (0 for all). Default: 0")
            },
            "additionalProperties": false
        }),
    )
}

/// Defines the tag rename tool.
pub fn rename_tag_tool() -> ToolDefinition {
    tool(
        "raindrop_rename_tag",
        "Rename a tag",
        json!({
            "type": "object",
            "properties": {
                "tag": { "type": "string", "minLength": 1, "description": "Current tag name" },
                "new_name": { "type": "string", "minLength": 1, "description": "New tag name" },
                "collection_id": collection_id("Limit to one collection (0 for all). Default: 0")
            },
            "required": ["tag", "new_name"],
            "additionalProperties": false
        }),
    )
}

/// Defines the tag merge tool.
pub fn merge_tags_tool() -> ToolDefinition {
    tool(
        "raindrop_merge_tags",
        "Merge several tags into one",
        json!({
            "type": "object",
            "properties": {
                "tags": tag_list("Tags to merge"),
                "new_name": { "type": "string", "minLength": 1, "description": "Resulting tag name" },
                "collection_id": collection_id("Limit to one collection (0 for all). Default: 0")
            },
            "required": ["tags", "new_name"],
            "additionalProperties": false
        }),
    )
}

/// Defines the tag delete tool.
pub fn delete_tags_tool() -> ToolDefinition {
    tool(
        "raindrop_delete_tags",
        "Remove tags from every raindrop carrying them",
        json!({
            "type": "object",
            "properties": {
                "tags": tag_list("Tags to delete"),
                "collection_id": collection_id("Limit to one collection (0 for all). Default: 0")
            },
            "required": ["tags"],
            "additionalProperties": false
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique_and_prefixed() {
        let tools = all_tools();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names.len(), tools.len());
        assert!(tools.iter().all(|t| t.name.starts_with("raindrop_")));
    }

    #[test]
    fn test_schemas_are_closed_objects() {
        for tool in all_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert_eq!(
                tool.input_schema["additionalProperties"], false,
                "{}",
                tool.name
            );
        }
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for tool in all_tools() {
            let properties = &tool.input_schema["properties"];
            let required = tool.input_schema["required"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            for field in required {
                let field = field.as_str().unwrap();
                assert!(properties.get(field).is_some(), "{}: {field}", tool.name);
            }
        }
    }
}
