//! Quote Vault MCP server entrypoint (stdio transport).
//!
//! Opens the SQLite-backed quote store, seeds it on first run, and serves tools, resources, and
//! prompts to an MCP host over stdin/stdout. Logs go to stderr.
use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use quote_vault::{
    config::{Config, normalize_log_level},
    logging,
    mcp::QuoteVaultMcpServer,
    storage::{QuoteStore, seed_database},
};
use rmcp::{service::ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(
    name = "quote-vault",
    version,
    about = "MCP server for a personal, tag-aware quote collection"
)]
struct Cli {
    /// SQLite database file (overrides QUOTE_VAULT_DB_PATH)
    #[arg(long)]
    db_path: Option<PathBuf>,
    /// Skip seeding the starter quotes
    #[arg(long, conflicts_with = "seed")]
    no_seed: bool,
    /// Seed an empty vault even when QUOTE_VAULT_AUTO_SEED disables it
    #[arg(long)]
    seed: bool,
    /// Log level directive (overrides QUOTE_VAULT_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.db_path {
            config.database_path = path.clone();
        }
        if self.no_seed {
            config.auto_seed = false;
        }
        if self.seed {
            config.auto_seed = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = normalize_log_level(level);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut config = Config::from_env().context("failed to load configuration")?;
    cli.apply(&mut config);
    logging::init_tracing(&config);

    let store = open_store(&config)?;
    let server = QuoteVaultMcpServer::new(Arc::new(store));
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}

/// Open the configured database and seed it once when seeding is enabled.
///
/// A seeding failure is logged and the existing data is served as-is.
fn open_store(config: &Config) -> Result<QuoteStore> {
    let store = QuoteStore::open(&config.database_path).with_context(|| {
        format!(
            "failed to open quote database at {}",
            config.database_path.display()
        )
    })?;
    tracing::info!(path = %config.database_path.display(), "Quote store ready");

    if config.auto_seed {
        match seed_database(&store, false) {
            Ok(outcome) => tracing::info!(
                added = outcome.added,
                total = outcome.total,
                "Seed check complete"
            ),
            Err(error) => tracing::warn!(%error, "Seeding failed; continuing with existing data"),
        }
    }
    Ok(store)
}
