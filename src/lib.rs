#![deny(missing_docs)]

//! Core library for the Quote Vault MCP server.

/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// SQLite-backed quote storage: schema, models, operations, and seeding.
pub mod storage;
