//! JSON schema builders for MCP tools.

use serde_json::{Map, Value, json};

/// Build the schema describing the `add_quote` tool input.
pub(crate) fn add_quote_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("text".into(), string_schema("The quote text"));
    properties.insert("author".into(), string_schema("Author name"));
    properties.insert(
        "source".into(),
        string_schema("Source of the quote (book, speech, etc.)"),
    );
    properties.insert("year".into(), integer_schema("Year published or said"));
    properties.insert("tags".into(), string_array_schema("Associated tags"));

    let mut schema = finalize_object_schema(properties, &["text", "author"]);
    schema.insert(
        "examples".into(),
        Value::Array(vec![json!({
            "text": "Don't Panic.",
            "author": "Douglas Adams",
            "source": "The Hitchhiker's Guide to the Galaxy",
            "year": 1979,
            "tags": ["humor", "wisdom"]
        })]),
    );
    schema
}

/// Build the schema describing the `search_quotes` tool input.
pub(crate) fn search_quotes_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "query".into(),
        string_schema("Case-insensitive substring matched against quote text and author"),
    );
    properties.insert(
        "author".into(),
        string_schema("Filter by author (exact match, case-insensitive)"),
    );
    properties.insert(
        "tags".into(),
        string_array_schema("Filter by tags; a quote must carry ALL listed tags"),
    );
    finalize_object_schema(properties, &[])
}

/// Build the schema describing the `random_quote` tool input.
pub(crate) fn random_quote_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("tag".into(), string_schema("Optional tag filter"));
    finalize_object_schema(properties, &[])
}

/// Build the schema describing the `update_quote` tool input.
pub(crate) fn update_quote_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("id".into(), id_schema("Quote ID"));
    properties.insert("text".into(), string_schema("Updated quote text"));
    properties.insert("author".into(), string_schema("Updated author name"));
    properties.insert(
        "source".into(),
        nullable_schema("string", "Updated source; null clears it"),
    );
    properties.insert(
        "year".into(),
        nullable_schema("integer", "Updated year; null clears it"),
    );
    properties.insert(
        "tags".into(),
        string_array_schema("Updated tags (replaces all existing tags)"),
    );
    finalize_object_schema(properties, &["id"])
}

/// Build the schema describing the `delete_quote` tool input.
pub(crate) fn delete_quote_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("id".into(), id_schema("Quote ID"));
    finalize_object_schema(properties, &["id"])
}

/// Build the schema describing the `add_tag` tool input.
pub(crate) fn add_tag_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("quote_id".into(), id_schema("Quote ID"));
    properties.insert("tag".into(), string_schema("Tag name to add"));
    finalize_object_schema(properties, &["quote_id", "tag"])
}

/// Schema representing an empty object (used for parameterless tools).
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn integer_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("integer".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn id_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("integer".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert("minimum".into(), Value::Number(1.into()));
    Value::Object(schema)
}

fn nullable_schema(kind: &str, description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert(
        "type".into(),
        Value::Array(vec![
            Value::String(kind.into()),
            Value::String("null".into()),
        ]),
    );
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn string_array_schema(description: &str) -> Value {
    let mut item_schema = Map::new();
    item_schema.insert("type".into(), Value::String("string".into()));
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("array".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert("items".into(), Value::Object(item_schema));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
