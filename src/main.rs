//! Lottery Backend Service
//!
//! Main entry point. Serves the JSON HTTP API for events, applications and
//! lottery draws.

use lottery_backend::api::build_router;
use lottery_backend::config::{AppConfig, StoreConfig};
use lottery_backend::database::Database;
use lottery_backend::error::{AppError, AppResult};
use lottery_backend::seed::seed_demo_data;
use lottery_backend::store::{LotteryStore, MemoryStore, PgStore};
use lottery_backend::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_tracing(&config);

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Lottery Backend Service Starting               ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("Store backend: {}", config.store.name());
    info!("HTTP port: {}", config.http_port);

    // =========================================================================
    // STORE SETUP
    // =========================================================================
    let store: Arc<dyn LotteryStore> = match &config.store {
        StoreConfig::Postgres(db_config) => {
            info!("Connecting to database...");
            let database = Database::connect(db_config).await.map_err(|e| {
                error!("Database startup failed: {}", e);
                AppError::Database(e)
            })?;
            Arc::new(PgStore::new(database))
        }
        StoreConfig::Memory => {
            warn!("Using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_demo_data {
        let report = seed_demo_data(store.as_ref()).await?;
        if !report.skipped() {
            info!(
                "✓ Demo data seeded ({} events, {} applications)",
                report.events, report.applications
            );
        }
    }

    let app_state = AppState::new(store);
    info!("✓ Application state initialized");

    // =========================================================================
    // START SERVER
    // =========================================================================
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Message(format!("Failed to bind HTTP server: {}", e)))?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Lottery Backend Service Ready!                 ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  HTTP API:     {}                              ║", addr);
    info!("║  Environment:  {}                               ║", config.environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, build_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Message(format!("HTTP server error: {}", e)))?;

    info!("Lottery backend service shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "lottery_backend={},sqlx=warn,tower_http=info",
            config.log_level
        )
        .into()
    });

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, shutting down gracefully...");
}
