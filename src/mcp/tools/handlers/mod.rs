//! Tool execution handlers.
//!
//! This module contains the execution logic for all MCP tools,
//! organized into submodules by domain.

mod collections;
mod raindrops;
mod tags;
mod user;

pub use collections::{
    execute_create_collection, execute_delete_collection, execute_delete_collections,
    execute_get_collection, execute_get_collections, execute_get_root_collections,
    execute_move_collection, execute_update_collection,
};
pub use raindrops::{
    execute_create_raindrop, execute_delete_raindrop, execute_delete_raindrops,
    execute_get_raindrop, execute_get_raindrops, execute_move_raindrop, execute_move_raindrops,
    execute_update_raindrop, execute_update_raindrops,
};
pub use tags::{execute_delete_tags, execute_get_tags, execute_merge_tags, execute_rename_tag};
pub use user::{execute_get_group, execute_get_groups, execute_get_total_raindrops, execute_get_user};

use super::{ToolContent, ToolResult};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments for tools that take none.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

/// Parses JSON arguments, converting errors to crate Error type.
///
/// A missing (`null`) argument object is treated as empty.
fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Creates a success result with text content.
fn text_result(text: String) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text { text }],
        is_error: false,
    }
}

/// Creates an error result with text content.
fn error_result(text: String) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text { text }],
        is_error: true,
    }
}

/// Creates a success result holding pretty-printed JSON.
fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<ToolResult> {
    serde_json::to_string_pretty(value)
        .map(text_result)
        .map_err(|e| Error::OperationFailed {
            operation: "serialize_tool_result".to_string(),
            cause: e.to_string(),
        })
}

/// Rejects blank strings.
fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Rejects empty lists.
fn require_items<T>(field: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Rejects blank tag names.
fn require_tag_names(field: &str, tags: &[String]) -> Result<()> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "{field} must not contain empty tag names"
        )));
    }
    Ok(())
}
