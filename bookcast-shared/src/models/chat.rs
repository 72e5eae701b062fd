//! Chat message persistence.
//!
//! Every turn (user or assistant) is one row, grouped by a caller-supplied
//! session ID. History reads oldest-first; clearing a session deletes its
//! turns wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One chat turn
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Conversation grouping key, opaque to the server
    pub session_id: String,

    pub message: String,

    /// True for user turns, false for assistant turns
    pub is_user: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for persisting a chat turn
#[derive(Debug, Clone)]
pub struct CreateChatMessage {
    pub user_id: Uuid,
    pub session_id: String,
    pub message: String,
    pub is_user: bool,
}

impl ChatMessage {
    /// Persists one chat turn
    pub async fn create(pool: &PgPool, data: CreateChatMessage) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (user_id, session_id, message, is_user)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, session_id, message, is_user, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.session_id)
        .bind(data.message)
        .bind(data.is_user)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Lists a user's turns oldest-first, optionally scoped to one session
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, user_id, session_id, message, is_user, created_at
            FROM chat_messages
            WHERE user_id = $1 AND ($2::text IS NULL OR session_id = $2)
            ORDER BY created_at ASC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(session_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Deletes all of a user's turns in one session, returning how many
    pub async fn clear_session(
        pool: &PgPool,
        user_id: Uuid,
        session_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM chat_messages WHERE user_id = $1 AND session_id = $2")
                .bind(user_id)
                .bind(session_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected())
    }
}
