//! Podcast model and database operations.
//!
//! A podcast row is a text-to-speech generation job plus its result. Rows
//! are created by the API in `queued`, claimed by the worker (`processing`),
//! and finished as `ready` or `failed`.
//!
//! # State Machine
//!
//! ```text
//! queued → processing → ready
//!                     → failed
//! ```
//!
//! Terminal states never transition again, and there are no automatic
//! retries. Every transition UPDATE carries a `WHERE status = '<from>'`
//! guard, so a stale writer affects zero rows instead of clobbering a later
//! state. `audio_path` is non-null exactly when status is `ready`; the
//! ready transition sets both in a single statement.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE podcasts (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     book_id INTEGER NOT NULL REFERENCES books(id),
//!     title VARCHAR(200) NOT NULL,
//!     description TEXT,
//!     duration_minutes INTEGER NOT NULL,
//!     status VARCHAR(20) NOT NULL DEFAULT 'queued',
//!     audio_path VARCHAR(500),
//!     file_size BIGINT,
//!     error_message TEXT,
//!     like_count INTEGER NOT NULL DEFAULT 0,
//!     play_count INTEGER NOT NULL DEFAULT 0,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     started_at TIMESTAMPTZ,
//!     completed_at TIMESTAMPTZ
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Podcast generation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastStatus {
    /// Waiting for a worker to pick it up
    Queued,

    /// A worker is generating the audio
    Processing,

    /// Audio artifact exists and is playable
    Ready,

    /// Generation failed; see error_message
    Failed,
}

impl PodcastStatus {
    /// Converts status to its database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PodcastStatus::Queued => "queued",
            PodcastStatus::Processing => "processing",
            PodcastStatus::Ready => "ready",
            PodcastStatus::Failed => "failed",
        }
    }

    /// Parses a database string back into a status
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(PodcastStatus::Queued),
            "processing" => Some(PodcastStatus::Processing),
            "ready" => Some(PodcastStatus::Ready),
            "failed" => Some(PodcastStatus::Failed),
            _ => None,
        }
    }

    /// Checks if the status is terminal (generation finished)
    pub fn is_terminal(&self) -> bool {
        matches!(self, PodcastStatus::Ready | PodcastStatus::Failed)
    }

    /// Checks if transition to target status is valid
    pub fn can_transition_to(&self, target: PodcastStatus) -> bool {
        match (self, target) {
            (PodcastStatus::Queued, PodcastStatus::Processing) => true,
            (PodcastStatus::Processing, PodcastStatus::Ready) => true,
            (PodcastStatus::Processing, PodcastStatus::Failed) => true,
            _ => false,
        }
    }
}

/// Podcast model representing one generation job and its result
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Podcast {
    /// Unique podcast ID
    pub id: Uuid,

    /// Owner of the podcast
    pub user_id: Uuid,

    /// Catalog book the audio is generated from
    pub book_id: i32,

    /// Display title
    pub title: String,

    /// Optional display description
    pub description: Option<String>,

    /// Requested audio length in minutes (paces the script)
    pub duration_minutes: i32,

    /// Current generation status (see PodcastStatus)
    pub status: String,

    /// Artifact file name inside the audio store (null unless ready)
    pub audio_path: Option<String>,

    /// Artifact size in bytes (null unless ready)
    pub file_size: Option<i64>,

    /// Error message (if status is failed)
    pub error_message: Option<String>,

    /// Number of likes from any authenticated user
    pub like_count: i32,

    /// Number of recorded plays
    pub play_count: i32,

    /// When the job was submitted
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,

    /// When a worker claimed the job (null while queued)
    pub started_at: Option<DateTime<Utc>>,

    /// When generation finished, either way (null until terminal)
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for submitting a new generation job
#[derive(Debug, Clone)]
pub struct CreatePodcast {
    pub user_id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
}

const PODCAST_COLUMNS: &str = "id, user_id, book_id, title, description, duration_minutes, \
     status, audio_path, file_size, error_message, like_count, play_count, \
     created_at, updated_at, started_at, completed_at";

impl Podcast {
    /// Creates a new podcast in queued status.
    ///
    /// Every submission is a new independent job; re-submitting the same
    /// book is allowed.
    pub async fn create(pool: &PgPool, data: CreatePodcast) -> Result<Self, sqlx::Error> {
        let podcast = sqlx::query_as::<_, Podcast>(&format!(
            r#"
            INSERT INTO podcasts (user_id, book_id, title, description, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PODCAST_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.book_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.duration_minutes)
        .fetch_one(pool)
        .await?;

        Ok(podcast)
    }

    /// Finds a podcast by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let podcast = sqlx::query_as::<_, Podcast>(&format!(
            "SELECT {PODCAST_COLUMNS} FROM podcasts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(podcast)
    }

    /// Finds a podcast by ID scoped to its owner.
    ///
    /// This is the preferred lookup for API reads; other users' podcasts
    /// are indistinguishable from missing ones.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let podcast = sqlx::query_as::<_, Podcast>(&format!(
            "SELECT {PODCAST_COLUMNS} FROM podcasts WHERE id = $1 AND user_id = $2",
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(podcast)
    }

    /// Lists a user's podcasts, newest first, optionally filtered by status
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let podcasts = sqlx::query_as::<_, Podcast>(&format!(
            r#"
            SELECT {PODCAST_COLUMNS}
            FROM podcasts
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(user_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(podcasts)
    }

    /// Counts a user's podcasts, optionally filtered by status
    pub async fn count_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM podcasts WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Counts all podcasts in a given status (health/status reporting)
    pub async fn count_by_status(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM podcasts WHERE status = $1")
                .bind(status)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Counts all podcasts
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM podcasts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Increments the like counter, returning the new count.
    ///
    /// Any authenticated user may like any podcast; ownership is not
    /// checked here.
    pub async fn increment_likes(pool: &PgPool, id: Uuid) -> Result<Option<i32>, sqlx::Error> {
        let count: Option<i32> = sqlx::query_scalar(
            "UPDATE podcasts SET like_count = like_count + 1, updated_at = NOW()
             WHERE id = $1 RETURNING like_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(count)
    }

    /// Records one play of the podcast
    pub async fn record_play(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE podcasts SET play_count = play_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a podcast row.
    ///
    /// Ownership must be checked by the caller before deleting; artifact
    /// file removal is also the caller's job.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM podcasts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(PodcastStatus::Queued.as_str(), "queued");
        assert_eq!(PodcastStatus::Processing.as_str(), "processing");
        assert_eq!(PodcastStatus::Ready.as_str(), "ready");
        assert_eq!(PodcastStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            PodcastStatus::Queued,
            PodcastStatus::Processing,
            PodcastStatus::Ready,
            PodcastStatus::Failed,
        ] {
            assert_eq!(PodcastStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PodcastStatus::parse("canceled"), None);
        assert_eq!(PodcastStatus::parse(""), None);
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!PodcastStatus::Queued.is_terminal());
        assert!(!PodcastStatus::Processing.is_terminal());
        assert!(PodcastStatus::Ready.is_terminal());
        assert!(PodcastStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_transitions() {
        assert!(PodcastStatus::Queued.can_transition_to(PodcastStatus::Processing));
        assert!(PodcastStatus::Processing.can_transition_to(PodcastStatus::Ready));
        assert!(PodcastStatus::Processing.can_transition_to(PodcastStatus::Failed));

        // Queued never skips straight to a terminal state
        assert!(!PodcastStatus::Queued.can_transition_to(PodcastStatus::Ready));
        assert!(!PodcastStatus::Queued.can_transition_to(PodcastStatus::Failed));

        // Terminal states never transition
        assert!(!PodcastStatus::Ready.can_transition_to(PodcastStatus::Processing));
        assert!(!PodcastStatus::Ready.can_transition_to(PodcastStatus::Failed));
        assert!(!PodcastStatus::Failed.can_transition_to(PodcastStatus::Queued));
        assert!(!PodcastStatus::Failed.can_transition_to(PodcastStatus::Ready));
    }
}
