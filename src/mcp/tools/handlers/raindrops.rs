//! Raindrop (bookmark) tool handlers.

use super::super::{ToolContext, ToolResult};
use super::{json_result, parse_args, require_items, require_tag_names, require_text, text_result};
use crate::models::{
    ALL_COLLECTION_ID, CollectionId, RaindropCreate, RaindropId, RaindropQuery, RaindropUpdate,
    RaindropsUpdate,
};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Value, json};

/// Arguments naming one raindrop.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RaindropIdArgs {
    raindrop_id: RaindropId,
}

/// Arguments for `raindrop_get_raindrops`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetRaindropsArgs {
    #[serde(default)]
    collection_id: Option<CollectionId>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    perpage: Option<u32>,
    #[serde(default)]
    nested: bool,
}

/// Arguments for `raindrop_create_raindrop`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateRaindropArgs {
    link: String,
    #[serde(default)]
    collection_id: Option<CollectionId>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    important: Option<bool>,
}

/// Arguments for `raindrop_update_raindrop`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateRaindropArgs {
    raindrop_id: RaindropId,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    important: Option<bool>,
}

/// Arguments for `raindrop_update_raindrops`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateRaindropsArgs {
    collection_id: CollectionId,
    #[serde(default)]
    raindrop_ids: Option<Vec<RaindropId>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    important: Option<bool>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    nested: bool,
}

/// Arguments for `raindrop_move_raindrop`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveRaindropArgs {
    raindrop_id: RaindropId,
    collection_id: CollectionId,
}

/// Arguments for `raindrop_move_raindrops`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveRaindropsArgs {
    collection_id: CollectionId,
    target_collection_id: CollectionId,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    raindrop_ids: Option<Vec<RaindropId>>,
    #[serde(default)]
    nested: bool,
}

/// Arguments for `raindrop_delete_raindrop`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteRaindropArgs {
    raindrop_id: RaindropId,
    #[serde(default)]
    permanent: bool,
}

/// Arguments for `raindrop_delete_raindrops`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteRaindropsArgs {
    collection_id: CollectionId,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    raindrop_ids: Option<Vec<RaindropId>>,
    #[serde(default)]
    permanent: bool,
}

/// Validates an optional id filter: present means non-empty.
fn check_ids(ids: Option<&[RaindropId]>) -> Result<()> {
    ids.map_or(Ok(()), |ids| require_items("raindrop_ids", ids))
}

/// Drops blank search expressions.
fn non_blank(search: Option<&str>) -> Option<&str> {
    search.filter(|s| !s.trim().is_empty())
}

/// Executes `raindrop_get_raindrop`.
pub fn execute_get_raindrop(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: RaindropIdArgs = parse_args(arguments)?;
    json_result(&ctx.client().raindrop(args.raindrop_id)?)
}

/// Executes `raindrop_get_raindrops`.
pub fn execute_get_raindrops(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: GetRaindropsArgs = parse_args(arguments)?;
    if args.perpage == Some(0) {
        return Err(Error::InvalidInput("perpage must be at least 1".to_string()));
    }

    let query = RaindropQuery {
        search: args.search,
        page: args.page,
        perpage: args.perpage,
        nested: args.nested,
    };
    let collection_id = args.collection_id.unwrap_or(ALL_COLLECTION_ID);
    json_result(&ctx.client().raindrops(collection_id, &query)?)
}

/// Executes `raindrop_create_raindrop`.
pub fn execute_create_raindrop(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CreateRaindropArgs = parse_args(arguments)?;
    require_text("link", &args.link)?;
    if let Some(tags) = &args.tags {
        require_tag_names("tags", tags)?;
    }

    let mut create = RaindropCreate::new(args.link);
    create.collection_id = args.collection_id;
    create.tags = args.tags;
    create.important = args.important;
    json_result(&ctx.client().create_raindrop(&create)?)
}

/// Executes `raindrop_update_raindrop`.
pub fn execute_update_raindrop(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateRaindropArgs = parse_args(arguments)?;
    if let Some(link) = &args.link {
        require_text("link", link)?;
    }
    if let Some(tags) = &args.tags {
        require_tag_names("tags", tags)?;
    }

    let update = RaindropUpdate {
        link: args.link,
        tags: args.tags,
        important: args.important,
        ..RaindropUpdate::default()
    };
    json_result(&ctx.client().update_raindrop(args.raindrop_id, &update)?)
}

/// Executes `raindrop_update_raindrops`.
pub fn execute_update_raindrops(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateRaindropsArgs = parse_args(arguments)?;
    check_ids(args.raindrop_ids.as_deref())?;
    if let Some(tags) = &args.tags {
        require_tag_names("tags", tags)?;
    }
    if args.tags.is_none() && args.important.is_none() {
        return Err(Error::InvalidInput(
            "nothing to update: set tags or important".to_string(),
        ));
    }

    let update = RaindropsUpdate {
        ids: args.raindrop_ids,
        important: args.important,
        tags: args.tags,
        collection_id: None,
    };
    let modified = ctx.client().update_raindrops(
        args.collection_id,
        &update,
        args.nested,
        non_blank(args.search.as_deref()),
    )?;
    json_result(&json!({ "modified": modified }))
}

/// Executes `raindrop_move_raindrop`.
pub fn execute_move_raindrop(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MoveRaindropArgs = parse_args(arguments)?;
    let moved = ctx
        .client()
        .update_raindrop(args.raindrop_id, &RaindropUpdate::moved_to(args.collection_id))?;
    json_result(&moved)
}

/// Executes `raindrop_move_raindrops`.
pub fn execute_move_raindrops(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MoveRaindropsArgs = parse_args(arguments)?;
    check_ids(args.raindrop_ids.as_deref())?;

    let update = RaindropsUpdate {
        ids: args.raindrop_ids,
        collection_id: Some(args.target_collection_id),
        ..RaindropsUpdate::default()
    };
    let modified = ctx.client().update_raindrops(
        args.collection_id,
        &update,
        args.nested,
        non_blank(args.search.as_deref()),
    )?;
    json_result(&json!({ "modified": modified }))
}

/// Executes `raindrop_delete_raindrop`.
pub fn execute_delete_raindrop(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: DeleteRaindropArgs = parse_args(arguments)?;
    ctx.client()
        .delete_raindrop(args.raindrop_id, args.permanent)?;

    let outcome = if args.permanent {
        "permanently deleted"
    } else {
        "moved to trash"
    };
    Ok(text_result(format!(
        "Raindrop {} {outcome}",
        args.raindrop_id
    )))
}

/// Executes `raindrop_delete_raindrops`.
pub fn execute_delete_raindrops(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: DeleteRaindropsArgs = parse_args(arguments)?;
    check_ids(args.raindrop_ids.as_deref())?;

    let modified = ctx.client().delete_raindrops(
        args.collection_id,
        non_blank(args.search.as_deref()),
        args.raindrop_ids.as_deref(),
        args.permanent,
    )?;
    json_result(&json!({ "modified": modified }))
}
