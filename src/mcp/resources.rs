//! URI-addressed read accessors exposed as MCP resources.
//!
//! Every supported URI parses into a [`QuoteResource`] variant; reading a variant queries the
//! store and renders a JSON document.

use rmcp::{
    ErrorData as McpError,
    model::{
        AnnotateAble, RawResource, RawResourceTemplate, ReadResourceResult, Resource,
        ResourceTemplate,
    },
};
use serde_json::json;
use thiserror::Error;

use crate::{
    mcp::{
        format::{APPLICATION_JSON, StatsSnapshot, json_resource_contents, serialize_json},
        handlers::map_storage_error,
    },
    storage::QuoteStore,
};

const SCHEME: &str = "quote://";

/// URI of the full collection.
pub const ALL_URI: &str = "quote://all";
/// URI of a random pick.
pub const RANDOM_URI: &str = "quote://random";
/// URI of collection statistics.
pub const STATS_URI: &str = "quote://stats";
/// URI of the tag listing.
pub const TAGS_URI: &str = "quote://tags";

/// A parsed `quote://` resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteResource {
    /// `quote://all`
    All,
    /// `quote://id/{id}`
    ById(i64),
    /// `quote://author/{author}`
    ByAuthor(String),
    /// `quote://tag/{tag}`
    ByTag(String),
    /// `quote://random`
    Random,
    /// `quote://stats`
    Stats,
    /// `quote://tags`
    Tags,
}

/// Reasons a URI does not address a quote resource.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceUriError {
    /// Scheme or path does not match any known resource.
    #[error("Unknown resource URI: {0}")]
    Unknown(String),
    /// The `{id}` segment is not a positive integer.
    #[error("Invalid quote id in resource URI: {0}")]
    InvalidId(String),
    /// The author or tag segment is empty or not valid percent-encoding.
    #[error("Invalid {segment} in resource URI: {uri}")]
    InvalidSegment {
        /// Which template parameter was malformed.
        segment: &'static str,
        /// The offending URI.
        uri: String,
    },
}

impl From<ResourceUriError> for McpError {
    fn from(error: ResourceUriError) -> Self {
        McpError::invalid_params(error.to_string(), None)
    }
}

impl QuoteResource {
    /// Parse a `quote://` URI. Author and tag segments are percent-decoded.
    pub fn parse(uri: &str) -> Result<Self, ResourceUriError> {
        let unknown = || ResourceUriError::Unknown(uri.to_string());
        let path = uri.strip_prefix(SCHEME).ok_or_else(unknown)?;

        match path {
            "all" => return Ok(Self::All),
            "random" => return Ok(Self::Random),
            "stats" => return Ok(Self::Stats),
            "tags" => return Ok(Self::Tags),
            _ => {}
        }

        let (kind, value) = path.split_once('/').ok_or_else(unknown)?;
        match kind {
            "id" => value
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(Self::ById)
                .ok_or_else(|| ResourceUriError::InvalidId(uri.to_string())),
            "author" => decode_segment(value, "author", uri).map(Self::ByAuthor),
            "tag" => decode_segment(value, "tag", uri).map(Self::ByTag),
            _ => Err(unknown()),
        }
    }

    /// Query the store and render this resource as JSON contents for `uri`.
    pub fn read(&self, store: &QuoteStore, uri: &str) -> Result<ReadResourceResult, McpError> {
        let text = match self {
            Self::All => {
                let quotes = store.list_quotes().map_err(map_storage_error)?;
                serialize_json(&quotes, uri)
            }
            Self::ById(id) => match store.get_quote(*id).map_err(map_storage_error)? {
                Some(quote) => serialize_json(&quote, uri),
                None => {
                    return Err(McpError::resource_not_found(
                        format!("Quote with ID {id} not found"),
                        Some(json!({ "uri": uri })),
                    ));
                }
            },
            Self::ByAuthor(author) => {
                let quotes = store.quotes_by_author(author).map_err(map_storage_error)?;
                serialize_json(&quotes, uri)
            }
            Self::ByTag(tag) => {
                let quotes = store.quotes_by_tag(tag).map_err(map_storage_error)?;
                serialize_json(&quotes, uri)
            }
            Self::Random => match store.random_quote(None).map_err(map_storage_error)? {
                Some(quote) => serialize_json(&quote, uri),
                None => serialize_json(&json!({ "error": "No quotes available" }), uri),
            },
            Self::Stats => {
                let stats = store.statistics().map_err(map_storage_error)?;
                serialize_json(&StatsSnapshot::from(stats), uri)
            }
            Self::Tags => {
                let tags = store.list_tags().map_err(map_storage_error)?;
                serialize_json(&tags, uri)
            }
        };

        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(uri, text)],
        })
    }
}

fn decode_segment(
    raw: &str,
    segment: &'static str,
    uri: &str,
) -> Result<String, ResourceUriError> {
    let invalid = || ResourceUriError::InvalidSegment {
        segment,
        uri: uri.to_string(),
    };
    let decoded = urlencoding::decode(raw).map_err(|_| invalid())?;
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

/// Static resources advertised through `resources/list`.
pub(crate) fn describe_resources() -> Vec<Resource> {
    let entries = [
        (ALL_URI, "All Quotes", "Returns all quotes in the vault"),
        (RANDOM_URI, "Random Quote", "Returns a random quote from the vault"),
        (
            STATS_URI,
            "Collection Statistics",
            "Returns statistics about the quote collection",
        ),
        (TAGS_URI, "All Tags", "Returns all tags with their usage counts"),
    ];

    entries
        .into_iter()
        .map(|(uri, name, description)| {
            let mut resource = RawResource::new(uri, name);
            resource.description = Some(description.into());
            resource.mime_type = Some(APPLICATION_JSON.into());
            resource.no_annotation()
        })
        .collect()
}

/// Parameterized resources advertised through `resources/templates/list`.
pub(crate) fn describe_resource_templates() -> Vec<ResourceTemplate> {
    let entries = [
        (
            "quote://id/{id}",
            "quote-by-id",
            "Quote by ID",
            "Get a specific quote by its ID",
        ),
        (
            "quote://author/{author}",
            "quotes-by-author",
            "Quotes by Author",
            "Get all quotes by a specific author (percent-encode the name)",
        ),
        (
            "quote://tag/{tag}",
            "quotes-by-tag",
            "Quotes by Tag",
            "Get all quotes carrying a specific tag",
        ),
    ];

    entries
        .into_iter()
        .map(|(uri_template, name, title, description)| {
            RawResourceTemplate {
                uri_template: uri_template.into(),
                name: name.into(),
                title: Some(title.into()),
                description: Some(description.into()),
                mime_type: Some(APPLICATION_JSON.into()),
            }
            .no_annotation()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewQuote;
    use rmcp::model::{ErrorCode, ResourceContents};
    use serde_json::Value;

    fn body(result: ReadResourceResult) -> Value {
        match result.contents.into_iter().next() {
            Some(ResourceContents::TextResourceContents { text, .. }) => {
                serde_json::from_str(&text).unwrap()
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }

    #[test]
    fn parses_static_and_templated_uris() {
        assert_eq!(QuoteResource::parse("quote://all"), Ok(QuoteResource::All));
        assert_eq!(QuoteResource::parse("quote://stats"), Ok(QuoteResource::Stats));
        assert_eq!(QuoteResource::parse("quote://id/12"), Ok(QuoteResource::ById(12)));
        assert_eq!(
            QuoteResource::parse("quote://author/Douglas%20Adams"),
            Ok(QuoteResource::ByAuthor("Douglas Adams".into()))
        );
        assert_eq!(
            QuoteResource::parse("quote://tag/science-fiction"),
            Ok(QuoteResource::ByTag("science-fiction".into()))
        );
    }

    #[test]
    fn rejects_malformed_uris() {
        assert!(matches!(
            QuoteResource::parse("quote://id/abc"),
            Err(ResourceUriError::InvalidId(_))
        ));
        assert!(matches!(
            QuoteResource::parse("quote://id/0"),
            Err(ResourceUriError::InvalidId(_))
        ));
        assert!(matches!(
            QuoteResource::parse("quote://author/"),
            Err(ResourceUriError::InvalidSegment { segment: "author", .. })
        ));
        assert!(matches!(
            QuoteResource::parse("mcp://all"),
            Err(ResourceUriError::Unknown(_))
        ));
        assert!(matches!(
            QuoteResource::parse("quote://nothing"),
            Err(ResourceUriError::Unknown(_))
        ));
    }

    #[test]
    fn missing_id_is_resource_not_found() {
        let store = QuoteStore::open_in_memory().unwrap();
        let error = QuoteResource::ById(3)
            .read(&store, "quote://id/3")
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[test]
    fn random_on_empty_store_reports_error_payload() {
        let store = QuoteStore::open_in_memory().unwrap();
        let value = body(QuoteResource::Random.read(&store, RANDOM_URI).unwrap());
        assert_eq!(value, json!({ "error": "No quotes available" }));
    }

    #[test]
    fn author_lookup_ignores_case() {
        let store = QuoteStore::open_in_memory().unwrap();
        store.add_quote(NewQuote::new("Don't Panic.", "Douglas Adams")).unwrap();
        store.add_quote(NewQuote::new("Know thyself.", "Socrates")).unwrap();
        let value = body(
            QuoteResource::ByAuthor("douglas adams".into())
                .read(&store, "quote://author/douglas%20adams")
                .unwrap(),
        );
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["text"], "Don't Panic.");
    }

    #[test]
    fn stats_render_top_entries() {
        let store = QuoteStore::open_in_memory().unwrap();
        store
            .add_quote(NewQuote::new("One", "Ada").with_tags(["math"]))
            .unwrap();
        store
            .add_quote(NewQuote::new("Two", "Ada").with_tags(["math", "code"]))
            .unwrap();
        let value = body(QuoteResource::Stats.read(&store, STATS_URI).unwrap());
        assert_eq!(value["total_quotes"], 2);
        assert_eq!(value["total_authors"], 1);
        assert_eq!(value["total_tags"], 2);
        assert_eq!(value["most_quoted_author"], "Ada (2 quotes)");
        assert_eq!(value["most_common_tag"], "math (2 quotes)");
    }
}
