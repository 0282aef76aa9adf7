//! Handlers for the read-side tools `search_quotes` and `random_quote`.

use std::sync::Arc;

use crate::{
    mcp::{
        format::{format_quote, format_quote_listing, quote_value},
        handlers::{map_storage_error, normalize_tags_argument, parse_arguments, parse_arguments_value},
    },
    storage::{QuoteStore, SearchFilter, models::normalize_tags},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Raw search request payload accepted from MCP clients.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SearchQuotesRequest {
    /// Substring matched against text and author.
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Exact author filter.
    #[serde(default)]
    pub(crate) author: Option<String>,
    /// All-of tag filter.
    #[serde(default)]
    pub(crate) tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RandomQuoteRequest {
    #[serde(default)]
    pub(crate) tag: Option<String>,
}

/// Handle `search_quotes` by filtering the collection on substring, author, and tags.
pub(crate) async fn handle_search_quotes(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let mut map = arguments.unwrap_or_default();
    normalize_tags_argument(&mut map);
    let args: SearchQuotesRequest = parse_arguments_value(Value::Object(map))?;

    let filter = SearchFilter {
        query: args.query,
        author: args.author,
        tags: args.tags,
    };
    let used_filters = build_used_filters(&filter);
    let quotes = store.search(&filter).map_err(map_storage_error)?;
    tracing::info!(results = quotes.len(), "search_quotes");

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "count": quotes.len(),
        "quotes": quotes.iter().map(quote_value).collect::<Vec<_>>(),
        "usedFilters": used_filters,
        "summary": format_quote_listing(&quotes),
    })))
}

/// Handle `random_quote`, optionally restricted to one tag.
pub(crate) async fn handle_random_quote(
    store: &Arc<QuoteStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: RandomQuoteRequest = parse_arguments(arguments)?;
    let tag = args
        .tag
        .as_deref()
        .map(str::trim)
        .filter(|tag| !tag.is_empty());

    let quote = store.random_quote(tag).map_err(map_storage_error)?;
    tracing::info!(tag = tag.unwrap_or(""), found = quote.is_some(), "random_quote");

    let payload = match quote {
        Some(quote) => json!({
            "status": "ok",
            "found": true,
            "quote": quote_value(&quote),
            "summary": format_quote(&quote),
        }),
        None => {
            let summary = match tag {
                Some(tag) => format!("No quotes found with tag '{tag}'."),
                None => "No quotes found in the vault.".to_string(),
            };
            json!({
                "status": "not_found",
                "found": false,
                "tag": tag,
                "summary": summary,
            })
        }
    };
    Ok(CallToolResult::structured(payload))
}

fn build_used_filters(filter: &SearchFilter) -> Value {
    let mut used = Map::new();
    if let Some(query) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        used.insert("query".into(), Value::String(query.into()));
    }
    if let Some(author) = filter.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        used.insert("author".into(), Value::String(author.into()));
    }
    let tags = normalize_tags(&filter.tags);
    if !tags.is_empty() {
        used.insert("tags".into(), json!(tags));
    }
    Value::Object(used)
}
