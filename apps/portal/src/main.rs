//! # Canvass Portal API
//!
//! HTTP server for the door-to-door sales-tracking portal.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Portal API Server                            │
//! │                                                                     │
//! │  Client ───► axum (8080) ───► handlers ───► SaleService            │
//! │                                  │              │                   │
//! │                                  │         canvass-core             │
//! │                                  ▼              │                   │
//! │                              canvass-db ◄───────┘                   │
//! │                               (SQLite)                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod handlers;
mod permissions;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtManager;
use crate::config::PortalConfig;
use crate::state::AppState;
use canvass_core::Catalog;
use canvass_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides, sqlx kept quiet by default.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Canvass portal API...");

    // Load configuration
    let config = PortalConfig::load()?;
    info!(
        port = config.http_port,
        db = %config.database_path,
        auto_approve = config.auto_approve_sales,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    // Build shared state
    let catalog = Catalog::builtin();
    info!(plans = catalog.len(), "Catalog loaded");

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
    let state = AppState::new(db, catalog, config.sales_settings(), jwt);

    // Serve
    let app = routes::configure_routes(state);
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
