//! Tag tool handlers.

use super::super::{ToolContext, ToolResult};
use super::{json_result, parse_args, require_items, require_tag_names, require_text, text_result};
use crate::Result;
use crate::models::{ALL_COLLECTION_ID, CollectionId};
use serde::Deserialize;
use serde_json::Value;

/// Arguments for `raindrop_get_tags`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetTagsArgs {
    #[serde(default)]
    collection_id: Option<CollectionId>,
}

/// Arguments for `raindrop_rename_tag`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenameTagArgs {
    tag: String,
    new_name: String,
    #[serde(default)]
    collection_id: Option<CollectionId>,
}

/// Arguments for `raindrop_merge_tags`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MergeTagsArgs {
    tags: Vec<String>,
    new_name: String,
    #[serde(default)]
    collection_id: Option<CollectionId>,
}

/// Arguments for `raindrop_delete_tags`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteTagsArgs {
    tags: Vec<String>,
    #[serde(default)]
    collection_id: Option<CollectionId>,
}

/// Executes `raindrop_get_tags`.
pub fn execute_get_tags(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: GetTagsArgs = parse_args(arguments)?;
    let collection_id = args.collection_id.unwrap_or(ALL_COLLECTION_ID);
    json_result(&ctx.client().tags(collection_id)?)
}

/// Executes `raindrop_rename_tag`.
pub fn execute_rename_tag(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: RenameTagArgs = parse_args(arguments)?;
    require_text("tag", &args.tag)?;
    require_text("new_name", &args.new_name)?;

    ctx.client().rename_tag(
        &args.tag,
        &args.new_name,
        args.collection_id.unwrap_or(ALL_COLLECTION_ID),
    )?;
    Ok(text_result(format!(
        "Tag \"{}\" renamed to \"{}\"",
        args.tag, args.new_name
    )))
}

/// Executes `raindrop_merge_tags`.
pub fn execute_merge_tags(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MergeTagsArgs = parse_args(arguments)?;
    require_items("tags", &args.tags)?;
    require_tag_names("tags", &args.tags)?;
    require_text("new_name", &args.new_name)?;

    ctx.client().merge_tags(
        &args.tags,
        &args.new_name,
        args.collection_id.unwrap_or(ALL_COLLECTION_ID),
    )?;
    Ok(text_result(format!(
        "Merged {} tag(s) into \"{}\"",
        args.tags.len(),
        args.new_name
    )))
}

/// Executes `raindrop_delete_tags`.
pub fn execute_delete_tags(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: DeleteTagsArgs = parse_args(arguments)?;
    require_items("tags", &args.tags)?;
    require_tag_names("tags", &args.tags)?;

    ctx.client()
        .delete_tags(&args.tags, args.collection_id.unwrap_or(ALL_COLLECTION_ID))?;
    Ok(text_result(format!("Deleted {} tag(s)", args.tags.len())))
}
