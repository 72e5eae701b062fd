//! Book catalog model.
//!
//! The catalog is seeded by migration and read-only at runtime: there is no
//! create/update/delete surface. Filtering, sorting, and pagination run in
//! SQL; the sort column is whitelisted here rather than interpolated from
//! user input.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A literary work in the seeded catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Catalog ID (stable, assigned by the seed migration)
    pub id: i32,

    pub title: String,

    pub author: String,

    /// Year of first publication
    pub year: i32,

    pub genre: String,

    /// Short catalog blurb
    pub description: String,

    /// Longer summary used by the chat assistant and script generator
    pub summary: String,

    /// Central themes, consumed by the script generator
    pub themes: Vec<String>,

    /// Major characters, consumed by the script generator
    pub characters: Vec<String>,

    /// Relative popularity score (0-100)
    pub popularity: i32,

    /// Average reader rating (0-5)
    pub rating: f32,

    pub pages: i32,

    pub language: String,

    pub cover_url: Option<String>,

    /// Where the text came from (e.g., "Public Domain")
    pub source: Option<String>,
}

/// Catalog query parameters
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Exact genre match, case-insensitive
    pub genre: Option<String>,

    /// Substring match over title, author, genre, and description
    pub search: Option<String>,

    /// Sort key: title, author, year, popularity, rating
    pub sort_by: Option<String>,

    /// "asc" or "desc"
    pub sort_order: Option<String>,
}

/// Maps the requested sort to a safe ORDER BY clause.
///
/// Unknown keys fall back to popularity, unknown orders to descending.
fn order_by_clause(sort_by: Option<&str>, sort_order: Option<&str>) -> String {
    let column = match sort_by {
        Some("title") => "LOWER(title)",
        Some("author") => "LOWER(author)",
        Some("year") => "year",
        Some("rating") => "rating",
        _ => "popularity",
    };

    let direction = match sort_order {
        Some("asc") => "ASC",
        _ => "DESC",
    };

    format!("{column} {direction}")
}

/// Escapes LIKE/ILIKE wildcards in user-supplied search input.
///
/// Without this a search for "%" matches the whole catalog.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn search_pattern(search: Option<&String>) -> Option<String> {
    search.map(|s| format!("%{}%", escape_like(s)))
}

const BOOK_COLUMNS: &str = "id, title, author, year, genre, description, summary, \
     themes, characters, popularity, rating, pages, language, cover_url, source";

impl Book {
    /// Finds a book by catalog ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(book)
    }

    /// Finds a book by exact title, case-insensitive
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Self>, sqlx::Error> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE LOWER(title) = LOWER($1)",
        ))
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(book)
    }

    /// Lists catalog books matching the filter, with pagination
    pub async fn list(
        pool: &PgPool,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let order = order_by_clause(filter.sort_by.as_deref(), filter.sort_order.as_deref());
        let pattern = search_pattern(filter.search.as_ref());

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE ($1::text IS NULL OR LOWER(genre) = LOWER($1))
              AND ($2::text IS NULL
                   OR title ILIKE $2 OR author ILIKE $2
                   OR genre ILIKE $2 OR description ILIKE $2)
            ORDER BY {order}
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(filter.genre.as_deref())
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(books)
    }

    /// Counts catalog books matching the filter
    pub async fn count(pool: &PgPool, filter: &BookFilter) -> Result<i64, sqlx::Error> {
        let pattern = search_pattern(filter.search.as_ref());

        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM books
            WHERE ($1::text IS NULL OR LOWER(genre) = LOWER($1))
              AND ($2::text IS NULL
                   OR title ILIKE $2 OR author ILIKE $2
                   OR genre ILIKE $2 OR description ILIKE $2)
            "#,
        )
        .bind(filter.genre.as_deref())
        .bind(pattern)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists the distinct genres present in the catalog
    pub async fn genres(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let genres: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT genre FROM books ORDER BY genre")
                .fetch_all(pool)
                .await?;

        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_defaults_to_popularity_desc() {
        assert_eq!(order_by_clause(None, None), "popularity DESC");
    }

    #[test]
    fn test_order_by_whitelists_columns() {
        assert_eq!(order_by_clause(Some("title"), Some("asc")), "LOWER(title) ASC");
        assert_eq!(order_by_clause(Some("author"), None), "LOWER(author) DESC");
        assert_eq!(order_by_clause(Some("year"), Some("asc")), "year ASC");
        assert_eq!(order_by_clause(Some("rating"), Some("desc")), "rating DESC");
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(escape_like("100% wool"), "100\\% wool");
        assert_eq!(escape_like("under_score"), "under\\_score");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(
            search_pattern(Some(&"%".to_string())).as_deref(),
            Some("%\\%%")
        );
        assert_eq!(search_pattern(None), None);
    }

    #[test]
    fn test_order_by_rejects_unknown_input() {
        // Injection attempts collapse to the defaults
        assert_eq!(
            order_by_clause(Some("popularity; DROP TABLE books"), Some("asc; --")),
            "popularity DESC"
        );
        assert_eq!(order_by_clause(Some("id"), Some("DESC")), "popularity DESC");
    }
}
