//! Tool handlers for the MCP server.

use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::storage::StorageError;

pub mod quotes;
pub mod search;
pub mod tags;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    parse_arguments_value(value)
}

/// Deserialize arguments represented as a JSON value into the target type.
pub(crate) fn parse_arguments_value<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Translate a storage failure into the MCP error surfaced to the client.
pub(crate) fn map_storage_error(error: StorageError) -> McpError {
    if error.is_validation() {
        return McpError::invalid_params(error.to_string(), None);
    }
    tracing::error!(%error, "Quote store operation failed");
    McpError::internal_error(error.to_string(), None)
}

/// Reject identifiers SQLite never assigns.
pub(crate) fn require_positive_id(field: &str, id: i64) -> Result<i64, McpError> {
    if id < 1 {
        return Err(McpError::invalid_params(
            format!("`{field}` must be a positive integer"),
            None,
        ));
    }
    Ok(id)
}

/// Accept either a single tag string or an array of tags.
pub(crate) fn normalize_tags_argument(map: &mut JsonObject) {
    let Some(Value::String(tag)) = map.get("tags") else {
        return;
    };
    let tags = if tag.trim().is_empty() {
        Vec::new()
    } else {
        vec![Value::String(tag.clone())]
    };
    map.insert("tags".into(), Value::Array(tags));
}

/// Keep an explicit `null` distinct from an absent field.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct SourceField {
        #[serde(default, deserialize_with = "deserialize_some")]
        source: Option<Option<String>>,
    }

    #[test]
    fn explicit_null_differs_from_missing() {
        let missing: SourceField = parse_arguments_value(json!({})).unwrap();
        let cleared: SourceField = parse_arguments_value(json!({ "source": null })).unwrap();
        let set: SourceField = parse_arguments_value(json!({ "source": "Book" })).unwrap();
        assert_eq!(missing.source, None);
        assert_eq!(cleared.source, Some(None));
        assert_eq!(set.source, Some(Some("Book".into())));
    }

    #[test]
    fn validation_errors_become_invalid_params() {
        let error = map_storage_error(StorageError::Validation("Quote text cannot be empty".into()));
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "Quote text cannot be empty");
    }

    #[test]
    fn other_storage_errors_become_internal() {
        let error = map_storage_error(StorageError::LockPoisoned);
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(require_positive_id("id", 0).is_err());
        assert!(require_positive_id("id", -4).is_err());
        assert_eq!(require_positive_id("id", 9).unwrap(), 9);
    }

    #[test]
    fn single_tag_string_becomes_array() {
        let mut map = json!({ "tags": "humor" }).as_object().cloned().unwrap();
        normalize_tags_argument(&mut map);
        assert_eq!(map["tags"], json!(["humor"]));

        let mut blank = json!({ "tags": "  " }).as_object().cloned().unwrap();
        normalize_tags_argument(&mut blank);
        assert_eq!(blank["tags"], json!([]));
    }

    #[test]
    fn tag_arrays_pass_through_untouched() {
        let mut map = json!({ "tags": ["humor", "famous"] }).as_object().cloned().unwrap();
        normalize_tags_argument(&mut map);
        assert_eq!(map["tags"], json!(["humor", "famous"]));

        let mut absent = json!({ "text": "Hi" }).as_object().cloned().unwrap();
        normalize_tags_argument(&mut absent);
        assert!(!absent.contains_key("tags"));
    }
}
