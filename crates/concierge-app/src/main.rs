//! Concierge server binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Open the SQLite database and seed the knowledge catalog
//! 3. Build the assistant over the database-backed store
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use concierge_api::{start_server, AppState};
use concierge_chat::{builtin_catalog, Assistant};
use concierge_core::config::ConciergeConfig;
use concierge_storage::{Database, SqliteStore};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = ConciergeConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // RUST_LOG takes precedence over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Concierge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let db_path = config.database_path();
    if let Some(dir) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!(path = %dir.display(), error = %e, "Failed to create data directory");
            return Err(e.into());
        }
    }

    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let store = SqliteStore::new(db);
    if config.storage.seed_knowledge {
        store.seed_knowledge_if_empty(&builtin_catalog())?;
    }

    let assistant = Assistant::with_config(Arc::new(store), &config.chat);
    let state = AppState::new(config.clone(), assistant);

    if let Err(e) = start_server(&config, state).await {
        tracing::error!(error = %e, "API server stopped");
        tracing::error!(
            "Is another instance running? Try: CONCIERGE_PORT={} cargo run -p concierge-app",
            config.general.port.saturating_add(1)
        );
        return Err(e.into());
    }

    Ok(())
}
