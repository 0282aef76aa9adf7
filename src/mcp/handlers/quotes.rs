//! Handlers for the quote lifecycle tools: `add_quote`, `update_quote`, `delete_quote`.

use std::sync::Arc;

use crate::{
    mcp::{
        format::{format_quote, quote_value},
        handlers::{
            deserialize_some, map_storage_error, normalize_tags_argument, parse_arguments,
            parse_arguments_value, require_positive_id,
        },
    },
    storage::{NewQuote, QuoteStore, QuoteUpdate},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Request payload accepted by the `add_quote` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AddQuoteRequest {
    pub(crate) text: String,
    pub(crate) author: String,
    #[serde(default)]
    pub(crate) source: Option<String>,
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
}

/// Request payload accepted by the `update_quote` tool.
///
/// `source` and `year` distinguish an explicit `null` (clear) from an absent key (keep).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct UpdateQuoteRequest {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) author: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub(crate) source: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub(crate) year: Option<Option<i32>>,
    #[serde(default)]
    pub(crate) tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DeleteQuoteRequest {
    pub(crate) id: i64,
}

/// Handle `add_quote` by validating and persisting a new quote.
pub(crate) async fn handle_add_quote(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let mut map = arguments.unwrap_or_default();
    normalize_tags_argument(&mut map);
    let args: AddQuoteRequest = parse_arguments_value(Value::Object(map))?;

    let quote = store
        .add_quote(NewQuote {
            text: args.text,
            author: args.author,
            source: args.source,
            year: args.year,
            tags: args.tags,
        })
        .map_err(map_storage_error)?;
    tracing::info!(id = quote.id, author = %quote.author, "add_quote");

    let summary = format!(
        "Quote added successfully with ID {}\n\n\"{}\"\n— {}",
        quote.id, quote.text, quote.author
    );
    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "quote": quote_value(&quote),
        "summary": summary,
    })))
}

/// Handle `update_quote` by applying a partial update to an existing quote.
pub(crate) async fn handle_update_quote(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let mut map = arguments.unwrap_or_default();
    normalize_tags_argument(&mut map);
    let args: UpdateQuoteRequest = parse_arguments_value(Value::Object(map))?;
    let id = require_positive_id("id", args.id)?;

    let update = QuoteUpdate {
        text: args.text,
        author: args.author,
        source: args.source,
        year: args.year,
        tags: args.tags,
    };
    if update.is_empty() {
        return Err(McpError::invalid_params(
            "No fields specified for update",
            None,
        ));
    }

    let updated = store.update_quote(id, update).map_err(map_storage_error)?;
    tracing::info!(id, updated, "update_quote");
    if !updated {
        return Ok(not_found_payload(id, "updated"));
    }

    let quote = store.get_quote(id).map_err(map_storage_error)?;
    let summary = match &quote {
        Some(quote) => format!("Quote {id} updated successfully\n\n{}", format_quote(quote)),
        None => format!("Quote {id} updated successfully"),
    };
    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "updated": true,
        "quote": quote.as_ref().map(quote_value),
        "summary": summary,
    })))
}

/// Handle `delete_quote` by removing a quote and its tag links.
pub(crate) async fn handle_delete_quote(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: DeleteQuoteRequest = parse_arguments(arguments)?;
    let id = require_positive_id("id", args.id)?;

    let deleted = store.delete_quote(id).map_err(map_storage_error)?;
    tracing::info!(id, deleted, "delete_quote");
    if !deleted {
        return Ok(not_found_payload(id, "deleted"));
    }

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "deleted": true,
        "id": id,
        "summary": format!("Quote {id} deleted successfully"),
    })))
}

fn not_found_payload(id: i64, flag: &str) -> CallToolResult {
    CallToolResult::structured(json!({
        "status": "not_found",
        flag: false,
        "id": id,
        "summary": format!("Quote with ID {id} not found"),
    }))
}
