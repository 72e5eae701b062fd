//! # Bookcast Worker
//!
//! Background worker that turns queued podcast requests into audio.
//!
//! ## Architecture
//!
//! The worker:
//! - Polls the `podcasts` table for queued jobs
//! - Builds a narration script from the book's catalog metadata
//! - Synthesizes audio with a text-to-speech engine (espeak-ng)
//! - Marks each podcast ready or failed
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p bookcast-worker
//! ```

use bookcast_shared::db;
use bookcast_shared::storage::ArtifactStore;
use bookcast_worker::config::WorkerConfig;
use bookcast_worker::orchestrator::Orchestrator;
use bookcast_worker::tts::EspeakEngine;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookcast_worker=info,bookcast_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Bookcast Worker v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = WorkerConfig::from_env()?;

    let db_config = db::DatabaseConfig {
        url: config.database_url.clone(),
        max_connections: config.max_connections,
        ..Default::default()
    };
    let pool = db::create_pool(db_config).await?;
    db::run_migrations(&pool).await?;

    let store = ArtifactStore::new(&config.audio_dir);
    store.ensure_dir()?;
    tracing::info!(audio_dir = %config.audio_dir.display(), "Artifact store ready");

    let engine = Arc::new(EspeakEngine::new(
        config.tts_command.clone(),
        config.tts_speech_rate,
    ));

    let orchestrator =
        Orchestrator::with_config(pool.clone(), store, engine, config.orchestrator.clone());

    let shutdown = orchestrator.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    // run() returns once in-flight jobs have drained
    orchestrator.run().await?;
    db::close_pool(pool).await;

    Ok(())
}
