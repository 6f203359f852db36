//! Collection tool handlers.

use super::super::{ToolContext, ToolResult};
use super::{NoArgs, json_result, parse_args, require_items, require_text, text_result};
use crate::Result;
use crate::models::{CollectionId, CollectionPayload};
use serde::Deserialize;
use serde_json::{Value, json};

/// Arguments naming one collection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CollectionIdArgs {
    collection_id: CollectionId,
}

/// Arguments for `raindrop_create_collection`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateCollectionArgs {
    title: String,
    #[serde(default)]
    parent_id: Option<CollectionId>,
}

/// Arguments for `raindrop_update_collection`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateCollectionArgs {
    collection_id: CollectionId,
    title: String,
}

/// Arguments for `raindrop_move_collection`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveCollectionArgs {
    collection_id: CollectionId,
    parent_id: CollectionId,
}

/// Arguments for `raindrop_delete_collections`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteCollectionsArgs {
    collection_ids: Vec<CollectionId>,
}

/// Executes `raindrop_get_root_collections`.
pub fn execute_get_root_collections(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: NoArgs = parse_args(arguments)?;
    json_result(&ctx.collection_service().root_collections()?)
}

/// Executes `raindrop_get_collections`.
pub fn execute_get_collections(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: NoArgs = parse_args(arguments)?;
    json_result(&ctx.collection_service().collection_tree()?)
}

/// Executes `raindrop_get_collection`.
pub fn execute_get_collection(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CollectionIdArgs = parse_args(arguments)?;
    json_result(&ctx.client().collection(args.collection_id)?)
}

/// Executes `raindrop_create_collection`.
pub fn execute_create_collection(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CreateCollectionArgs = parse_args(arguments)?;
    require_text("title", &args.title)?;

    // Zero is not a collection; the API files such a collection at top level.
    let payload = CollectionPayload {
        title: Some(args.title),
        parent_id: args.parent_id.filter(|&id| id != 0),
        public: None,
    };
    json_result(&ctx.client().create_collection(&payload)?)
}

/// Executes `raindrop_update_collection`.
pub fn execute_update_collection(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateCollectionArgs = parse_args(arguments)?;
    require_text("title", &args.title)?;

    let payload = CollectionPayload::titled(args.title);
    json_result(&ctx.client().update_collection(args.collection_id, &payload)?)
}

/// Executes `raindrop_move_collection`.
pub fn execute_move_collection(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MoveCollectionArgs = parse_args(arguments)?;

    let moved = ctx
        .client()
        .update_collection(args.collection_id, &CollectionPayload::moved_to(args.parent_id))?;
    json_result(&moved)
}

/// Executes `raindrop_delete_collection`.
pub fn execute_delete_collection(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CollectionIdArgs = parse_args(arguments)?;
    ctx.client().delete_collection(args.collection_id)?;
    Ok(text_result(format!(
        "Collection {} deleted",
        args.collection_id
    )))
}

/// Executes `raindrop_delete_collections`.
pub fn execute_delete_collections(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: DeleteCollectionsArgs = parse_args(arguments)?;
    require_items("collection_ids", &args.collection_ids)?;

    let modified = ctx.client().delete_collections(&args.collection_ids)?;
    json_result(&json!({ "modified": modified }))
}
