//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        handlers::{
            quotes::{handle_add_quote, handle_delete_quote, handle_update_quote},
            search::{handle_random_quote, handle_search_quotes},
            tags::{handle_add_tag, handle_list_tags},
        },
        prompts, registry,
        resources::{self, QuoteResource},
        schemas,
    },
    storage::QuoteStore,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult,
        JsonObject, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
        ListToolsResult, ReadResourceRequestParam, ReadResourceResult, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};
use serde_json::{Map, Value};

/// MCP server implementation exposing Quote Vault operations.
#[derive(Clone)]
pub struct QuoteVaultMcpServer {
    store: Arc<QuoteStore>,
    registry: Arc<registry::Registry>,
}

struct ToolSpec {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    schema: fn() -> Map<String, Value>,
    read_only: bool,
    destructive: bool,
    idempotent: bool,
}

const TOOL_SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: "add_quote",
        title: "Add Quote",
        description: "Add a new quote to the vault",
        schema: schemas::add_quote_input_schema,
        read_only: false,
        destructive: false,
        idempotent: false,
    },
    ToolSpec {
        name: "search_quotes",
        title: "Search Quotes",
        description: "Search for quotes using substring matching; tag filters require every listed tag",
        schema: schemas::search_quotes_input_schema,
        read_only: true,
        destructive: false,
        idempotent: true,
    },
    ToolSpec {
        name: "random_quote",
        title: "Random Quote",
        description: "Get a random quote, optionally filtered by tag",
        schema: schemas::random_quote_input_schema,
        read_only: true,
        destructive: false,
        idempotent: false,
    },
    ToolSpec {
        name: "update_quote",
        title: "Update Quote",
        description: "Update an existing quote; supplied tags replace the current set",
        schema: schemas::update_quote_input_schema,
        read_only: false,
        destructive: true,
        idempotent: true,
    },
    ToolSpec {
        name: "delete_quote",
        title: "Delete Quote",
        description: "Delete a quote by ID",
        schema: schemas::delete_quote_input_schema,
        read_only: false,
        destructive: true,
        idempotent: true,
    },
    ToolSpec {
        name: "add_tag",
        title: "Add Tag",
        description: "Add a tag to an existing quote",
        schema: schemas::add_tag_input_schema,
        read_only: false,
        destructive: false,
        idempotent: true,
    },
    ToolSpec {
        name: "list_tags",
        title: "List Tags",
        description: "List all unique tags in the system with usage counts",
        schema: schemas::empty_object_schema,
        read_only: true,
        destructive: false,
        idempotent: true,
    },
];

impl QuoteVaultMcpServer {
    /// Create a new MCP server backed by the supplied quote store.
    pub fn new(store: Arc<QuoteStore>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_tool("add_quote", tool_add_quote);
        registry.register_tool("search_quotes", tool_search_quotes);
        registry.register_tool("random_quote", tool_random_quote);
        registry.register_tool("update_quote", tool_update_quote);
        registry.register_tool("delete_quote", tool_delete_quote);
        registry.register_tool("add_tag", tool_add_tag);
        registry.register_tool("list_tags", tool_list_tags);
        prompts::register(&mut registry);

        Self {
            store,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        TOOL_SPECS
            .iter()
            .map(|spec| Tool {
                name: Cow::Borrowed(spec.name),
                title: Some(spec.title.to_string()),
                description: Some(Cow::Borrowed(spec.description)),
                input_schema: Arc::new((spec.schema)()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title(spec.title)
                        .read_only(spec.read_only)
                        .destructive(spec.destructive)
                        .idempotent(spec.idempotent)
                        .open_world(false),
                ),
                icons: None,
            })
            .collect()
    }
}

fn tool_add_quote(server: &QuoteVaultMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_add_quote(&store, request.arguments).await })
}

fn tool_search_quotes(
    server: &QuoteVaultMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_search_quotes(&store, request.arguments).await })
}

fn tool_random_quote(
    server: &QuoteVaultMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_random_quote(&store, request.arguments).await })
}

fn tool_update_quote(
    server: &QuoteVaultMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_update_quote(&store, request.arguments).await })
}

fn tool_delete_quote(
    server: &QuoteVaultMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_delete_quote(&store, request.arguments).await })
}

fn tool_add_tag(server: &QuoteVaultMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_add_tag(&store, request.arguments).await })
}

fn tool_list_tags(
    server: &QuoteVaultMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_list_tags(&store).await })
}

impl ServerHandler for QuoteVaultMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "quote-vault".to_string();
        implementation.title = Some("Quote Vault MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to collect, search, and revisit memorable quotes. Add quotes with author, source, year, and tags; search by text, author, or tags; read quote:// resources for browsing and statistics.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = resources::describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_resource_templates(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        let templates = resources::describe_resource_templates();
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(templates)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn list_prompts(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        let prompts = prompts::describe_prompts();
        std::future::ready(Ok(ListPromptsResult::with_all_items(prompts)))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        let result = match self.registry.prompts.get(request.name.as_str()) {
            Some(render) => {
                tracing::info!(prompt = %request.name, "get_prompt");
                render(&request.arguments.unwrap_or_else(JsonObject::new))
            }
            None => Err(McpError::invalid_params(
                format!("Unknown prompt: {}", request.name),
                None,
            )),
        };
        std::future::ready(result)
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        let store = self.store.clone();
        async move {
            let uri = request.uri;
            let resource = QuoteResource::parse(&uri).map_err(|error| {
                tracing::warn!(uri = %uri, %error, "Rejected resource URI");
                McpError::from(error)
            })?;
            tracing::info!(uri = %uri, "read_resource");
            resource.read(&store, &uri)
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_described_tool_has_a_handler() {
        let server = QuoteVaultMcpServer::new(Arc::new(QuoteStore::open_in_memory().unwrap()));
        let tools = server.describe_tools();
        assert_eq!(tools.len(), 7);
        for tool in &tools {
            assert!(
                server.registry.tools.contains_key(tool.name.as_ref()),
                "missing handler for {}",
                tool.name
            );
        }
    }

    #[test]
    fn read_only_tools_are_annotated() {
        let server = QuoteVaultMcpServer::new(Arc::new(QuoteStore::open_in_memory().unwrap()));
        let search = server
            .describe_tools()
            .into_iter()
            .find(|tool| tool.name == "search_quotes")
            .unwrap();
        let annotations = search.annotations.unwrap();
        assert_eq!(annotations.read_only_hint, Some(true));
    }
}
