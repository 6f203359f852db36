//! User, stats and group tool handlers.

use super::super::{ToolContext, ToolResult};
use super::{NoArgs, error_result, json_result, parse_args, require_text};
use crate::Result;
use crate::models::{ALL_COLLECTION_ID, CollectionId};
use serde::Deserialize;
use serde_json::{Value, json};

/// Arguments for `raindrop_get_total_raindrops`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TotalRaindropsArgs {
    #[serde(default)]
    collection_id: Option<CollectionId>,
}

/// Arguments for `raindrop_get_group`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupArgs {
    name: String,
}

/// Executes `raindrop_get_user`.
pub fn execute_get_user(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: NoArgs = parse_args(arguments)?;
    json_result(&ctx.client().user()?)
}

/// Executes `raindrop_get_total_raindrops`.
pub fn execute_get_total_raindrops(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TotalRaindropsArgs = parse_args(arguments)?;
    let collection_id = args.collection_id.unwrap_or(ALL_COLLECTION_ID);

    let count = ctx.client().total_raindrops(collection_id)?;
    json_result(&json!({ "collection_id": collection_id, "count": count }))
}

/// Executes `raindrop_get_groups`.
pub fn execute_get_groups(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: NoArgs = parse_args(arguments)?;
    json_result(&ctx.client().user()?.groups)
}

/// Executes `raindrop_get_group`.
pub fn execute_get_group(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: GroupArgs = parse_args(arguments)?;
    require_text("name", &args.name)?;

    match ctx.client().group(&args.name)? {
        Some(group) => json_result(&group),
        None => Ok(error_result(format!("Group \"{}\" not found", args.name))),
    }
}
