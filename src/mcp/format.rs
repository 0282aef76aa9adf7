//! Formatting helpers shared across MCP handlers and resources.

use crate::storage::{Quote, Statistics, TagCount, TopEntry};
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Structured representation of a quote for tool payloads.
pub(crate) fn quote_value(quote: &Quote) -> Value {
    json!({
        "id": quote.id,
        "text": quote.text,
        "author": quote.author,
        "source": quote.source,
        "year": quote.year,
        "created_at": quote.created_at,
        "tags": quote.tags,
    })
}

fn source_line(quote: &Quote) -> Option<String> {
    quote.source.as_ref().map(|source| match quote.year {
        Some(year) => format!("{source} ({year})"),
        None => source.clone(),
    })
}

/// Render a single quote as a reader-facing block.
pub(crate) fn format_quote(quote: &Quote) -> String {
    let mut lines = vec![format!("\"{}\"", quote.text), format!("— {}", quote.author)];
    if let Some(source) = source_line(quote) {
        lines.push(format!("\nSource: {source}"));
    }
    if !quote.tags.is_empty() {
        lines.push(format!("Tags: {}", quote.tags.join(", ")));
    }
    lines.push(format!("\n[Quote ID: {}]", quote.id));
    lines.join("\n")
}

/// Render a list of quotes, one indented block per entry.
pub(crate) fn format_quote_listing(quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return "No quotes found matching your search criteria.".into();
    }

    let mut lines = vec![format!("Found {} quote(s):\n", quotes.len())];
    for quote in quotes {
        lines.push(format!("[{}] \"{}\"", quote.id, quote.text));
        lines.push(format!("    — {}", quote.author));
        if let Some(source) = source_line(quote) {
            lines.push(format!("    Source: {source}"));
        }
        if !quote.tags.is_empty() {
            lines.push(format!("    Tags: {}", quote.tags.join(", ")));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Render tag usage counts.
pub(crate) fn format_tag_listing(tags: &[TagCount]) -> String {
    if tags.is_empty() {
        return "No tags found in the system.".into();
    }

    let mut lines = vec![format!("Found {} tag(s):\n", tags.len())];
    lines.extend(
        tags.iter()
            .map(|tag| format!("  • {}: {} quote(s)", tag.name, tag.count)),
    );
    lines.join("\n")
}

/// Collection statistics returned by the `quote://stats` resource.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct StatsSnapshot {
    /// Number of stored quotes.
    pub(crate) total_quotes: u64,
    /// Number of distinct authors.
    pub(crate) total_authors: u64,
    /// Number of known tags.
    pub(crate) total_tags: u64,
    /// Leading author rendered as `name (n quotes)` or `N/A`.
    pub(crate) most_quoted_author: String,
    /// Leading tag rendered as `name (n quotes)` or `N/A`.
    pub(crate) most_common_tag: String,
}

impl From<Statistics> for StatsSnapshot {
    fn from(stats: Statistics) -> Self {
        Self {
            total_quotes: stats.total_quotes,
            total_authors: stats.total_authors,
            total_tags: stats.total_tags,
            most_quoted_author: top_entry_label(stats.most_quoted_author.as_ref()),
            most_common_tag: top_entry_label(stats.most_common_tag.as_ref()),
        }
    }
}

fn top_entry_label(entry: Option<&TopEntry>) -> String {
    entry
        .map(|entry| format!("{} ({} quotes)", entry.name, entry.count))
        .unwrap_or_else(|| "N/A".into())
}
