//! Model Context Protocol (MCP) integration for Quote Vault.
//!
//! This module wires the quote store into an MCP server so assistant hosts can manage quotes
//! over stdio. The surface area consists of:
//!
//! - Tools: `add_quote`, `search_quotes`, `random_quote`, `update_quote`, `delete_quote`,
//!   `add_tag`, and `list_tags`.
//! - Resources: `quote://all`, `quote://random`, `quote://stats`, `quote://tags`, plus the
//!   templated `quote://id/{id}`, `quote://author/{author}`, and `quote://tag/{tag}`.
//! - Prompts: `find-inspiration`, `quote-explainer`, and `add-quote-helper`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod prompts;
mod registry;
pub mod resources;
mod schemas;
mod server;

pub use server::QuoteVaultMcpServer;
