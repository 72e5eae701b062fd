//! Worker orchestrator.
//!
//! The main worker loop: claim queued podcasts, run each generation in its
//! own Tokio task, and record the outcome. Concurrency is capped with a
//! semaphore; graceful shutdown cancels the loop and waits for in-flight
//! jobs by reacquiring every permit.
//!
//! ```text
//! Orchestrator
//!   ├─> PodcastQueue: claim queued jobs (queued → processing)
//!   ├─> Book catalog: load the source book
//!   ├─> script: build narration script paced to the duration
//!   ├─> SpeechEngine: synthesize audio into a staging file
//!   ├─> ArtifactStore: rename staging file into place
//!   └─> PodcastQueue: mark ready / mark failed
//! ```
//!
//! A job failure is a data outcome, not a worker failure: every error in
//! the generation pipeline lands in `mark_failed` and the loop keeps going.

use crate::queue::{PodcastQueue, QueueError};
use crate::script;
use crate::tts::{EngineError, SpeechEngine};
use bookcast_shared::models::{Book, Podcast};
use bookcast_shared::storage::ArtifactStore;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Poll interval when the queue is empty, in seconds
    pub poll_interval_secs: u64,

    /// Maximum podcasts generated concurrently
    pub max_concurrent_jobs: usize,

    /// Maximum jobs claimed per poll
    pub claim_batch_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            poll_interval_secs: 1,
            max_concurrent_jobs: 4,
            claim_batch_size: 4,
        }
    }
}

/// Error in the generation pipeline for a single job
#[derive(Debug, Error)]
enum GenerateError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Book {0} is missing from the catalog")]
    BookMissing(i32),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact store rejected file name: {0}")]
    Storage(String),
}

/// Coordinates podcast generation
pub struct Orchestrator {
    db: PgPool,
    queue: PodcastQueue,
    store: ArtifactStore,
    engine: Arc<dyn SpeechEngine>,
    config: OrchestratorConfig,
    limiter: Arc<Semaphore>,
    shutdown_token: CancellationToken,
}

impl Orchestrator {
    pub fn new(db: PgPool, store: ArtifactStore, engine: Arc<dyn SpeechEngine>) -> Self {
        Self::with_config(db, store, engine, OrchestratorConfig::default())
    }

    pub fn with_config(
        db: PgPool,
        store: ArtifactStore,
        engine: Arc<dyn SpeechEngine>,
        config: OrchestratorConfig,
    ) -> Self {
        let queue = PodcastQueue::new(db.clone());
        let limiter = Arc::new(Semaphore::new(config.max_concurrent_jobs));

        Orchestrator {
            db,
            queue,
            store,
            engine,
            config,
            limiter,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token used to signal graceful shutdown from external handlers
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the worker loop until shutdown.
    ///
    /// On shutdown the loop stops claiming and waits for in-flight jobs to
    /// finish before returning.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            engine = self.engine.name(),
            max_concurrent_jobs = self.config.max_concurrent_jobs,
            "Worker orchestrator starting"
        );

        loop {
            if self.shutdown_token.is_cancelled() {
                break;
            }

            let available = self.limiter.available_permits();
            if available == 0 {
                // At capacity; check back shortly
                sleep(Duration::from_millis(100)).await;
                continue;
            }

            let batch = available.min(self.config.claim_batch_size) as i64;
            let jobs = match self.queue.claim_jobs(batch).await {
                Ok(jobs) => jobs,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim jobs");
                    self.idle().await;
                    continue;
                }
            };

            if jobs.is_empty() {
                self.idle().await;
                continue;
            }

            for job in jobs {
                self.dispatch(job).await;
            }
        }

        tracing::info!("Shutdown requested, waiting for in-flight jobs");
        let _ = self
            .limiter
            .acquire_many(self.config.max_concurrent_jobs as u32)
            .await;
        tracing::info!("Worker orchestrator shut down");

        Ok(())
    }

    /// Sleeps one poll interval, waking early on shutdown
    async fn idle(&self) {
        tokio::select! {
            _ = self.shutdown_token.cancelled() => {}
            _ = sleep(Duration::from_secs(self.config.poll_interval_secs)) => {}
        }
    }

    /// Spawns a Tokio task to generate one claimed podcast
    async fn dispatch(&self, job: Podcast) {
        let permit = match self.limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return, // semaphore closed, shutting down
        };

        let db = self.db.clone();
        let queue = self.queue.clone();
        let store = self.store.clone();
        let engine = self.engine.clone();

        tokio::spawn(async move {
            execute_job(job, db, queue, store, engine).await;
            drop(permit);
        });
    }
}

/// Runs the generation pipeline for one claimed podcast and records the
/// outcome. Never panics and never propagates pipeline errors.
pub async fn execute_job(
    job: Podcast,
    db: PgPool,
    queue: PodcastQueue,
    store: ArtifactStore,
    engine: Arc<dyn SpeechEngine>,
) {
    let podcast_id = job.id;

    tracing::info!(
        podcast_id = %podcast_id,
        book_id = job.book_id,
        duration_minutes = job.duration_minutes,
        "Generating podcast"
    );

    match generate(&job, &db, &store, engine.as_ref()).await {
        Ok((file_name, file_size)) => {
            if let Err(e) = queue.mark_ready(podcast_id, &file_name, file_size).await {
                report_stale(podcast_id, &e);
                // The row moved under us; don't leave an orphan artifact
                store.remove(&file_name);
            }
        }
        Err(e) => {
            tracing::warn!(podcast_id = %podcast_id, error = %e, "Generation failed");
            if let Err(mark_err) = queue.mark_failed(podcast_id, &e.to_string()).await {
                report_stale(podcast_id, &mark_err);
            }
        }
    }
}

fn report_stale(podcast_id: uuid::Uuid, error: &QueueError) {
    tracing::error!(podcast_id = %podcast_id, error = %error, "Failed to record job outcome");
}

/// The generation pipeline: script → synthesis → artifact.
///
/// Synthesizes into a `.part` staging file and renames into place so the
/// final artifact name only ever points at complete audio.
async fn generate(
    job: &Podcast,
    db: &PgPool,
    store: &ArtifactStore,
    engine: &dyn SpeechEngine,
) -> Result<(String, i64), GenerateError> {
    let book = Book::find_by_id(db, job.book_id)
        .await?
        .ok_or(GenerateError::BookMissing(job.book_id))?;

    let script = script::build_script(&book, job.duration_minutes);

    let file_name = ArtifactStore::file_name(job.id, engine.extension());
    let staging_name = format!("{file_name}.part");

    let staging_path = store
        .path_for(&staging_name)
        .ok_or_else(|| GenerateError::Storage(staging_name.clone()))?;
    let final_path = store
        .path_for(&file_name)
        .ok_or_else(|| GenerateError::Storage(file_name.clone()))?;

    if let Err(e) = engine.synthesize(&script, &staging_path).await {
        store.remove(&staging_name);
        return Err(e.into());
    }

    tokio::fs::rename(&staging_path, &final_path).await?;
    let file_size = tokio::fs::metadata(&final_path).await?.len() as i64;

    Ok((file_name, file_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator_config_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.poll_interval_secs, 1);
        assert_eq!(config.max_concurrent_jobs, 4);
        assert_eq!(config.claim_batch_size, 4);
    }

    // Integration tests with an actual database are in tests/worker_tests.rs
}
