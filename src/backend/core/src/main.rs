//! Inkledger Server - Main entry point
//!
//! Tracks ink and toner units through their lifecycle and serves the
//! refill dashboard.

use std::sync::Arc;

use inkledger_core::{
    api::{self, AppState},
    config::Config,
    db::Database,
    seed::SeedData,
    service::InventoryService,
    store::{InMemoryStore, InventoryStore},
    telemetry,
};

/// Environment variable naming an optional config file.
const CONFIG_FILE_ENV: &str = "INKLEDGER_CONFIG_FILE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let loaded = match std::env::var(CONFIG_FILE_ENV) {
        Ok(path) => Config::from_file(&path),
        Err(_) => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        Config::default()
    });

    telemetry::init_telemetry(&config.logging, &config.metrics)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Inkledger Server"
    );

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "Storage ready");

    let app_state = AppState::new(InventoryService::new(store))
        .with_frontend_url(config.server.frontend_url.clone());
    let app = api::build_router(app_state);

    // Start server
    let addr = config.server.bind_addr();
    tracing::info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Postgres when a database URL is configured, otherwise in-memory.
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn InventoryStore>> {
    if config.database.url.is_some() {
        let db = Database::connect(&config.database).await?;
        db.migrate().await?;
        tracing::info!("Connected to database, migrations applied");
        return Ok(Arc::new(db));
    }

    let store = if config.seed_demo_data {
        tracing::info!("Seeding in-memory store with demo data");
        InMemoryStore::with_seed(&SeedData::demo())
    } else {
        InMemoryStore::new()
    };
    Ok(Arc::new(store))
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
