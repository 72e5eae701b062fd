//! Podcast job queue.
//!
//! The queue is the podcasts table itself. Claiming selects queued rows
//! with `FOR UPDATE SKIP LOCKED` and flips them to `processing` in the same
//! statement, so concurrent workers never claim the same job and a crashed
//! claim rolls back to `queued`. Terminal transitions carry a
//! `WHERE status = 'processing'` guard; a stale writer updates zero rows.
//!
//! The ready transition sets `status`, `audio_path`, and `file_size` in one
//! UPDATE so readers never observe a ready podcast without its artifact.

use bookcast_shared::models::podcast::{Podcast, PodcastStatus};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Queue error
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row was missing or no longer in the expected status
    #[error("Podcast not found or not in expected status: {0}")]
    StaleJob(Uuid),
}

/// Reader/writer for the podcast job queue
#[derive(Clone)]
pub struct PodcastQueue {
    db: PgPool,
}

impl PodcastQueue {
    pub fn new(db: PgPool) -> Self {
        PodcastQueue { db }
    }

    /// Claims up to `limit` queued podcasts for generation.
    ///
    /// Atomically transitions them queued → processing and returns the
    /// claimed rows, oldest first.
    pub async fn claim_jobs(&self, limit: i64) -> Result<Vec<Podcast>, QueueError> {
        let jobs = sqlx::query_as::<_, Podcast>(
            r#"
            WITH queued_jobs AS (
                SELECT id
                FROM podcasts
                WHERE status = $1
                ORDER BY created_at ASC
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            UPDATE podcasts
            SET
                status = $3,
                started_at = NOW(),
                updated_at = NOW()
            FROM queued_jobs
            WHERE podcasts.id = queued_jobs.id
            RETURNING
                podcasts.id,
                podcasts.user_id,
                podcasts.book_id,
                podcasts.title,
                podcasts.description,
                podcasts.duration_minutes,
                podcasts.status,
                podcasts.audio_path,
                podcasts.file_size,
                podcasts.error_message,
                podcasts.like_count,
                podcasts.play_count,
                podcasts.created_at,
                podcasts.updated_at,
                podcasts.started_at,
                podcasts.completed_at
            "#,
        )
        .bind(PodcastStatus::Queued.as_str())
        .bind(limit)
        .bind(PodcastStatus::Processing.as_str())
        .fetch_all(&self.db)
        .await?;

        if !jobs.is_empty() {
            tracing::info!(count = jobs.len(), "Claimed podcast jobs");
        }

        Ok(jobs)
    }

    /// Number of podcasts waiting in the queue
    pub async fn queued_count(&self) -> Result<i64, QueueError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM podcasts WHERE status = $1")
                .bind(PodcastStatus::Queued.as_str())
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    /// Marks a podcast ready, committing the artifact atomically.
    ///
    /// Status, audio_path, and file_size land in a single UPDATE.
    pub async fn mark_ready(
        &self,
        podcast_id: Uuid,
        audio_path: &str,
        file_size: i64,
    ) -> Result<(), QueueError> {
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET
                status = $2,
                audio_path = $3,
                file_size = $4,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(podcast_id)
        .bind(PodcastStatus::Ready.as_str())
        .bind(audio_path)
        .bind(file_size)
        .bind(PodcastStatus::Processing.as_str())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueError::StaleJob(podcast_id));
        }

        tracing::info!(podcast_id = %podcast_id, file_size, "Podcast marked ready");
        Ok(())
    }

    /// Marks a podcast failed, recording the error on the row.
    ///
    /// The error stays on the entity; nothing is surfaced to the submitter
    /// except through status polling.
    pub async fn mark_failed(&self, podcast_id: Uuid, error: &str) -> Result<(), QueueError> {
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET
                status = $2,
                error_message = $3,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(podcast_id)
        .bind(PodcastStatus::Failed.as_str())
        .bind(error)
        .bind(PodcastStatus::Processing.as_str())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueError::StaleJob(podcast_id));
        }

        tracing::warn!(podcast_id = %podcast_id, error, "Podcast marked failed");
        Ok(())
    }
}

// Integration tests with an actual database are in tests/queue_tests.rs
