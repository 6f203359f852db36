//! MCP tool implementations.
//!
//! # Module Structure
//!
//! - [`definitions`]: Tool schema definitions (JSON Schema for input validation)
//! - [`handlers`]: Tool execution logic
//!   - [`handlers::user`]: user, stats and groups
//!   - [`handlers::collections`]: collection listing and CRUD
//!   - [`handlers::raindrops`]: bookmark listing and CRUD
//!   - [`handlers::tags`]: tag listing, rename, merge and delete

mod definitions;
mod handlers;

use crate::client::RaindropClient;
use crate::config::{CollectionFetch, RaindropConfig};
use crate::services::CollectionService;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared state handed to every tool handler.
pub struct ToolContext {
    client: Arc<RaindropClient>,
    fetch: CollectionFetch,
}

impl ToolContext {
    /// Creates a context around an existing client.
    #[must_use]
    pub const fn new(client: Arc<RaindropClient>, fetch: CollectionFetch) -> Self {
        Self { client, fetch }
    }

    /// Returns the REST client.
    #[must_use]
    pub fn client(&self) -> &RaindropClient {
        &self.client
    }

    /// Returns a collection service reading from the shared client.
    #[must_use]
    pub fn collection_service(&self) -> CollectionService<Arc<RaindropClient>> {
        CollectionService::new(Arc::clone(&self.client), self.fetch)
    }
}

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools in listing order.
    tools: IndexMap<String, ToolDefinition>,
    /// Handler state.
    context: ToolContext,
}

impl ToolRegistry {
    /// Creates a registry with every raindrop tool.
    #[must_use]
    pub fn new(context: ToolContext) -> Self {
        let tools = definitions::all_tools()
            .into_iter()
            .map(|tool| (tool.name.clone(), tool))
            .collect();

        Self { tools, context }
    }

    /// Creates a registry with a client built from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built, for example when no
    /// access token is configured.
    pub fn from_config(config: &RaindropConfig) -> Result<Self> {
        let client = RaindropClient::new(config)?;
        Ok(Self::new(ToolContext::new(
            Arc::new(client),
            config.collection_fetch,
        )))
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is unknown, the arguments are invalid, or
    /// the API request fails.
    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let ctx = &self.context;
        match name {
            // User and groups
            "raindrop_get_user" => handlers::execute_get_user(ctx, arguments),
            "raindrop_get_total_raindrops" => handlers::execute_get_total_raindrops(ctx, arguments),
            "raindrop_get_groups" => handlers::execute_get_groups(ctx, arguments),
            "raindrop_get_group" => handlers::execute_get_group(ctx, arguments),
            // Collections
            "raindrop_get_root_collections" => {
                handlers::execute_get_root_collections(ctx, arguments)
            },
            "raindrop_get_collections" => handlers::execute_get_collections(ctx, arguments),
            "raindrop_get_collection" => handlers::execute_get_collection(ctx, arguments),
            "raindrop_create_collection" => handlers::execute_create_collection(ctx, arguments),
            "raindrop_update_collection" => handlers::execute_update_collection(ctx, arguments),
            "raindrop_move_collection" => handlers::execute_move_collection(ctx, arguments),
            "raindrop_delete_collection" => handlers::execute_delete_collection(ctx, arguments),
            "raindrop_delete_collections" => handlers::execute_delete_collections(ctx, arguments),
            // Raindrops
            "raindrop_get_raindrop" => handlers::execute_get_raindrop(ctx, arguments),
            "raindrop_get_raindrops" => handlers::execute_get_raindrops(ctx, arguments),
            "raindrop_create_raindrop" => handlers::execute_create_raindrop(ctx, arguments),
            "raindrop_update_raindrop" => handlers::execute_update_raindrop(ctx, arguments),
            "raindrop_update_raindrops" => handlers::execute_update_raindrops(ctx, arguments),
            "raindrop_move_raindrop" => handlers::execute_move_raindrop(ctx, arguments),
            "raindrop_move_raindrops" => handlers::execute_move_raindrops(ctx, arguments),
            "raindrop_delete_raindrop" => handlers::execute_delete_raindrop(ctx, arguments),
            "raindrop_delete_raindrops" => handlers::execute_delete_raindrops(ctx, arguments),
            // Tags
            "raindrop_get_tags" => handlers::execute_get_tags(ctx, arguments),
            "raindrop_rename_tag" => handlers::execute_rename_tag(ctx, arguments),
            "raindrop_merge_tags" => handlers::execute_merge_tags(ctx, arguments),
            "raindrop_delete_tags" => handlers::execute_delete_tags(ctx, arguments),
            _ => Err(Error::InvalidInput(format!("Unknown tool: {name}"))),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Returns the concatenated text content.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        let config = RaindropConfig::default()
            .with_access_token("test-token")
            .with_api_url("http://127.0.0.1:9");
        ToolRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = registry();
        let tools = registry.list_tools();

        assert_eq!(tools.len(), 25);
        assert_eq!(tools[0].name, "raindrop_get_user");
        assert!(registry.get_tool("raindrop_get_collections").is_some());
        assert!(registry.get_tool("raindrop_delete_tags").is_some());
        assert!(registry.get_tool("raindrop_export").is_none());
    }

    #[test]
    fn test_every_listed_tool_is_dispatched() {
        let registry = registry();
        for tool in registry.list_tools() {
            // Ill-typed arguments fail validation before any request is sent.
            let result = registry.execute(&tool.name, serde_json::json!({"unexpected": true}));
            match result {
                Err(Error::InvalidInput(message)) => {
                    assert!(!message.starts_with("Unknown tool"), "{}", tool.name);
                },
                other => panic!("{} accepted unknown argument: {other:?}", tool.name),
            }
        }
    }

    #[test]
    fn test_unknown_tool() {
        let result = registry().execute("raindrop_fly", serde_json::json!({}));
        assert!(matches!(result, Err(Error::InvalidInput(m)) if m.contains("raindrop_fly")));
    }

    #[test]
    fn test_required_arguments_declared() {
        let registry = registry();
        let tool = registry.get_tool("raindrop_rename_tag").unwrap();
        let required = tool.input_schema["required"].as_array().unwrap();

        assert!(required.contains(&serde_json::json!("tag")));
        assert!(required.contains(&serde_json::json!("new_name")));
        assert!(!required.contains(&serde_json::json!("collection_id")));
    }

    #[test]
    fn test_tool_result_serialization() {
        let result = ToolResult {
            content: vec![ToolContent::Text {
                text: "ok".to_string(),
            }],
            is_error: false,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(result.text(), "ok");
    }
}
