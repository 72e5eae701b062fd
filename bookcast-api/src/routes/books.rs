/// Book catalog endpoints
///
/// The catalog is seeded by migration and read-only: there is no write
/// surface here. Listing supports genre filtering, substring search,
/// sorting, and page-based pagination.
///
/// # Endpoints
///
/// - `GET /api/books` - List books with filters
/// - `GET /api/books/genres` - Distinct genres
/// - `GET /api/books/:book_id` - One book

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use bookcast_shared::models::{Book, BookFilter};
use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: i64 = 12;
const MAX_PER_PAGE: i64 = 50;

/// Catalog listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,

    /// Genre filter; "all" or absent means no filter
    pub genre: Option<String>,

    /// Substring search over title, author, genre, and description
    pub search: Option<String>,

    /// Sort key: title, author, year, popularity, rating
    pub sort_by: Option<String>,

    /// "asc" or "desc"
    pub sort_order: Option<String>,
}

/// Pagination metadata shared by list responses
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Pagination {
            current_page: page,
            per_page,
            total,
            total_pages,
            has_next: page * per_page < total,
            has_prev: page > 1,
        }
    }
}

/// Clamps page-based pagination to sane bounds, returning (page, per_page)
pub fn clamp_pagination(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

/// Book list response
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

/// Single book response
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
}

/// Genres response
#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}

/// Lists catalog books with filtering, sorting, and pagination
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> ApiResult<Json<ListBooksResponse>> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page, DEFAULT_PER_PAGE);

    // "all" is the client's way of saying no genre filter
    let genre = query
        .genre
        .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case("all"));
    let search = query.search.filter(|s| !s.trim().is_empty());

    let filter = BookFilter {
        genre,
        search,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };

    let total = Book::count(&state.db, &filter).await?;
    let books = Book::list(&state.db, &filter, per_page, (page - 1) * per_page).await?;

    Ok(Json(ListBooksResponse {
        books,
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// Returns one catalog book
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<BookResponse>> {
    let book = Book::find_by_id(&state.db, book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    Ok(Json(BookResponse { book }))
}

/// Lists the distinct genres in the catalog
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<GenresResponse>> {
    let genres = Book::genres(&state.db).await?;

    Ok(Json(GenresResponse { genres }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 12, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(3, 12, 25);
        assert!(!p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(None, None, 12), (1, 12));
        assert_eq!(clamp_pagination(Some(0), Some(-5), 12), (1, 1));
        assert_eq!(clamp_pagination(Some(2), Some(500), 12), (2, MAX_PER_PAGE));
    }
}
