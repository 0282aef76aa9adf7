//! Handlers for `add_tag` and `list_tags`.

use std::sync::Arc;

use crate::{
    mcp::{
        format::format_tag_listing,
        handlers::{map_storage_error, parse_arguments, require_positive_id},
    },
    storage::QuoteStore,
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AddTagRequest {
    pub(crate) quote_id: i64,
    pub(crate) tag: String,
}

/// Handle `add_tag`; re-adding an existing tag succeeds without duplicating it.
pub(crate) async fn handle_add_tag(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: AddTagRequest = parse_arguments(arguments)?;
    let quote_id = require_positive_id("quote_id", args.quote_id)?;

    let added = store
        .add_tag_to_quote(quote_id, &args.tag)
        .map_err(map_storage_error)?;
    let tag = args.tag.trim();
    tracing::info!(quote_id, tag, added, "add_tag");

    if !added {
        return Ok(CallToolResult::structured(json!({
            "status": "not_found",
            "added": false,
            "quote_id": quote_id,
            "summary": format!("Quote with ID {quote_id} not found"),
        })));
    }

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "added": true,
        "quote_id": quote_id,
        "tag": tag,
        "summary": format!("Tag '{tag}' added to quote {quote_id}"),
    })))
}

/// Handle `list_tags` by reporting every tag with its usage count.
pub(crate) async fn handle_list_tags(store: &Arc<QuoteStore>) -> Result<CallToolResult, McpError> {
    let tags = store.list_tags().map_err(map_storage_error)?;
    tracing::info!(count = tags.len(), "list_tags");

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "count": tags.len(),
        "tags": tags,
        "summary": format_tag_listing(&tags),
    })))
}
