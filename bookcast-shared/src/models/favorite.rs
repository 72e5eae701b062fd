//! Favorite books.
//!
//! Both directions are idempotent: adding an existing favorite is absorbed
//! by `ON CONFLICT DO NOTHING`, and removing an absent one is a no-op
//! success. The UNIQUE(user_id, book_id) constraint guarantees at most one
//! row per pair even under concurrent adds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::book::Book;

/// One user-book favorite link
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FavoriteBook {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: i32,
    pub added_at: DateTime<Utc>,
}

impl FavoriteBook {
    /// Adds a favorite. Returns false if it already existed.
    pub async fn add(pool: &PgPool, user_id: Uuid, book_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorite_books (user_id, book_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a favorite. Returns false if there was nothing to remove.
    pub async fn remove(pool: &PgPool, user_id: Uuid, book_id: i32) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM favorite_books WHERE user_id = $1 AND book_id = $2")
                .bind(user_id)
                .bind(book_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a user's favorited books in the order they were added
    pub async fn list_books(pool: &PgPool, user_id: Uuid) -> Result<Vec<Book>, sqlx::Error> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author, b.year, b.genre, b.description, b.summary,
                   b.themes, b.characters, b.popularity, b.rating, b.pages, b.language,
                   b.cover_url, b.source
            FROM books b
            JOIN favorite_books f ON f.book_id = b.id
            WHERE f.user_id = $1
            ORDER BY f.added_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(books)
    }
}
