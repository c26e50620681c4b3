//! propstats HTTP Server Binary
//!
//! Main entry point for the property analytics REST API. It loads the
//! configuration, initializes the repository, sets up the HTTP router, and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin propstats-server
//! PORT=9000 RUST_LOG=debug cargo run --bin propstats-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `PAGE_SIZE`: Default listing page size (default: 10)
//! - `RUST_LOG`: Log filter directives, e.g. `debug` or `propstats=debug,tower_http=info`
//!   (default: info)

use std::env;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use propstats::config::ServerConfig;
use propstats::db::{LocalRepository, PropertyRepository};
use propstats::http::{create_router, AppState};

/// Log filter from `RUST_LOG`-style directives, falling back to `info`
/// when they are absent or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting propstats HTTP Server");

    let config = ServerConfig::load()?;
    let addr = config.bind_addr()?;

    let repository: Arc<dyn PropertyRepository> = Arc::new(LocalRepository::new());
    info!("Repository initialized successfully");

    let state = AppState::with_config(repository, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
