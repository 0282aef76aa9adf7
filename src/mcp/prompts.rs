//! Guidance prompts that steer an assistant toward the quote tools.

use rmcp::{
    ErrorData as McpError,
    model::{
        GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
    },
};
use serde_json::Value;

use super::registry::Registry;

pub(crate) const FIND_INSPIRATION: &str = "find-inspiration";
pub(crate) const QUOTE_EXPLAINER: &str = "quote-explainer";
pub(crate) const ADD_QUOTE_HELPER: &str = "add-quote-helper";

/// Register every prompt renderer with the dispatch table.
pub(crate) fn register(registry: &mut Registry) {
    registry.register_prompt(FIND_INSPIRATION, render_find_inspiration);
    registry.register_prompt(QUOTE_EXPLAINER, render_quote_explainer);
    registry.register_prompt(ADD_QUOTE_HELPER, render_add_quote_helper);
}

/// Prompt descriptors advertised through `prompts/list`.
pub(crate) fn describe_prompts() -> Vec<Prompt> {
    vec![
        Prompt::new(
            FIND_INSPIRATION,
            Some("Find relevant quotes for your current situation or question"),
            Some(vec![argument(
                "situation",
                "Your current situation or question",
                true,
            )]),
        ),
        Prompt::new(
            QUOTE_EXPLAINER,
            Some("Analyze and explain the deeper meaning of a quote"),
            Some(vec![
                argument("quote_text", "The quote to analyze", true),
                argument("author", "The quote's author (optional)", false),
            ]),
        ),
        Prompt::new(
            ADD_QUOTE_HELPER,
            Some("Guide you through adding a well-structured quote"),
            Some(vec![argument(
                "raw_input",
                "Your raw input about the quote you want to add",
                true,
            )]),
        ),
    ]
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.into(),
        title: None,
        description: Some(description.into()),
        required: Some(required),
    }
}

fn render_find_inspiration(arguments: &JsonObject) -> Result<GetPromptResult, McpError> {
    let situation = required_argument(arguments, FIND_INSPIRATION, "situation")?;
    let text = format!(
        "You are helping a user find inspirational or relevant quotes from their personal Quote Vault.

User's situation or question: {situation}

Your task:
1. Understand what the user is looking for
2. Search the quote vault using appropriate keywords and tags
3. Present the most relevant quotes with explanation of why they're relevant
4. If no perfect match, suggest related quotes or offer to help add new ones

Available tools: search_quotes, random_quote
Available resources: quote://tag/*, quote://author/*

Be thoughtful and consider the emotional or philosophical context of their request."
    );
    Ok(user_prompt(format!("Finding inspiration for: {situation}"), text))
}

fn render_quote_explainer(arguments: &JsonObject) -> Result<GetPromptResult, McpError> {
    let quote_text = required_argument(arguments, QUOTE_EXPLAINER, "quote_text")?;
    let author = optional_argument(arguments, "author").unwrap_or("Unknown");
    let text = format!(
        "You are a literary and philosophical analyst helping users understand quotes more deeply.

Quote to analyze: {quote_text}
Author: {author}

Your task:
1. Explain the literal meaning
2. Discuss the deeper philosophical or metaphorical meaning
3. Provide historical or cultural context if relevant
4. Suggest how this quote might apply to modern life
5. Identify related themes or concepts

Be insightful but accessible. Use examples to illustrate your points."
    );
    Ok(user_prompt(format!("Analyzing quote by {author}"), text))
}

fn render_add_quote_helper(arguments: &JsonObject) -> Result<GetPromptResult, McpError> {
    let raw_input = required_argument(arguments, ADD_QUOTE_HELPER, "raw_input")?;
    let text = format!(
        "You are helping a user add a new quote to their Quote Vault.

User wants to add: {raw_input}

Your task:
1. Extract the quote text and author from their input
2. Ask clarifying questions if needed (source, year, context)
3. Suggest appropriate tags based on the quote's themes
4. Format everything properly
5. Use the add_quote tool to save it

Be conversational and helpful. Ensure accuracy - verify author attribution if uncertain."
    );
    Ok(user_prompt("Helping add a new quote".to_string(), text))
}

fn user_prompt(description: String, text: String) -> GetPromptResult {
    GetPromptResult {
        description: Some(description),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    }
}

fn optional_argument<'a>(arguments: &'a JsonObject, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required_argument<'a>(
    arguments: &'a JsonObject,
    prompt: &str,
    name: &str,
) -> Result<&'a str, McpError> {
    optional_argument(arguments, name).ok_or_else(|| {
        McpError::invalid_params(
            format!("Prompt `{prompt}` requires a non-empty `{name}` argument"),
            None,
        )
    })
}
