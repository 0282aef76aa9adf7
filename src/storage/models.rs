//! Plain records exchanged between the store and its callers.

use std::collections::HashSet;

use serde::Serialize;
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// A stored quote together with its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Identifier assigned by SQLite on insert.
    pub id: i64,
    /// Quote body; never empty.
    pub text: String,
    /// Attributed author; never empty.
    pub author: String,
    /// Book, speech, or other origin of the quote.
    pub source: Option<String>,
    /// Year the quote was published or said.
    pub year: Option<i32>,
    /// Insertion time as RFC 3339.
    pub created_at: String,
    /// Tag names sorted alphabetically.
    pub tags: Vec<String>,
}

/// Input for a new quote.
#[derive(Debug, Clone, Default)]
pub struct NewQuote {
    /// Quote body.
    pub text: String,
    /// Attributed author.
    pub author: String,
    /// Optional source.
    pub source: Option<String>,
    /// Optional year.
    pub year: Option<i32>,
    /// Tags to attach; blanks are ignored and duplicates collapse.
    pub tags: Vec<String>,
}

impl NewQuote {
    /// Build a quote input with only the required fields.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Attach tags to the input.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update applied to an existing quote.
///
/// `None` leaves a field untouched. For `source` and `year`, `Some(None)` clears the stored value.
/// `tags`, when present, replaces the full tag set.
#[derive(Debug, Clone, Default)]
pub struct QuoteUpdate {
    /// Replacement text.
    pub text: Option<String>,
    /// Replacement author.
    pub author: Option<String>,
    /// Replacement or cleared source.
    pub source: Option<Option<String>>,
    /// Replacement or cleared year.
    pub year: Option<Option<i32>>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
}

impl QuoteUpdate {
    /// Whether the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.author.is_none()
            && self.source.is_none()
            && self.year.is_none()
            && self.tags.is_none()
    }
}

/// Filters for [`crate::storage::QuoteStore::search`]. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring matched against text or author.
    pub query: Option<String>,
    /// Case-insensitive exact author match.
    pub author: Option<String>,
    /// Every listed tag must be present on the quote.
    pub tags: Vec<String>,
}

/// A tag with the number of quotes referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    /// Tag name.
    pub name: String,
    /// Number of quotes carrying the tag.
    pub count: u64,
}

/// Name and frequency of the leading author or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopEntry {
    /// Author or tag name.
    pub name: String,
    /// Number of quotes.
    pub count: u64,
}

/// Aggregate counts describing the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Number of stored quotes.
    pub total_quotes: u64,
    /// Number of distinct authors.
    pub total_authors: u64,
    /// Number of tag rows, referenced or not.
    pub total_tags: u64,
    /// Author with the most quotes.
    pub most_quoted_author: Option<TopEntry>,
    /// Tag attached to the most quotes.
    pub most_common_tag: Option<TopEntry>,
}

/// Trim, drop blanks, and de-duplicate tag names while keeping first-seen order.
pub(crate) fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter_map(|tag| {
            let trimmed = tag.as_ref().trim();
            (!trimmed.is_empty() && seen.insert(trimmed.to_string())).then(|| trimmed.to_string())
        })
        .collect()
}

/// Convert SQLite's `CURRENT_TIMESTAMP` text (UTC) into RFC 3339, keeping the raw value if it
/// does not parse.
pub(crate) fn normalize_timestamp(raw: Option<String>) -> String {
    let Some(raw) = raw else {
        return OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
    };
    let layout = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(&raw, layout)
        .ok()
        .and_then(|parsed| parsed.assume_utc().format(&Rfc3339).ok())
        .unwrap_or(raw)
}
