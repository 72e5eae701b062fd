//! # Bookcast API Server
//!
//! HTTP API for the Bookcast service: user accounts, the book catalog,
//! favorites, the chat assistant, and podcast generation jobs.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - JWT-authenticated JSON endpoints under /api
//! - Static serving of generated audio under /audio
//! - Asynchronous podcast submission (the worker does the generation)
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p bookcast-api
//! ```

use bookcast_api::app::{build_router, AppState};
use bookcast_api::config::Config;
use bookcast_shared::db;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookcast_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Bookcast API v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db_config = db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let pool = db::create_pool(db_config).await?;
    db::run_migrations(&pool).await?;

    let state = AppState::new(pool, config.clone());
    state.artifacts.ensure_dir()?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
