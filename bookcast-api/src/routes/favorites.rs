/// Favorite books endpoints
///
/// Both add and remove are idempotent: re-adding an existing favorite and
/// removing an absent one are successes, with the `added` / `removed` flag
/// reporting whether anything actually changed.
///
/// # Endpoints
///
/// - `GET /api/favorites/books` - List favorited books
/// - `POST /api/favorites/books/:book_id` - Add a favorite
/// - `DELETE /api/favorites/books/:book_id` - Remove a favorite

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bookcast_shared::models::{Book, FavoriteBook};
use serde::Serialize;

/// Favorites list response
#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub books: Vec<Book>,
    pub count: usize,
}

/// Add response
#[derive(Debug, Serialize)]
pub struct AddFavoriteResponse {
    pub book_id: i32,

    /// False if the book was already a favorite
    pub added: bool,
}

/// Remove response
#[derive(Debug, Serialize)]
pub struct RemoveFavoriteResponse {
    pub book_id: i32,

    /// False if there was nothing to remove
    pub removed: bool,
}

/// Lists the user's favorited books in the order they were added
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<ListFavoritesResponse>> {
    let books = FavoriteBook::list_books(&state.db, auth_user.id).await?;
    let count = books.len();

    Ok(Json(ListFavoritesResponse { books, count }))
}

/// Adds a book to favorites
///
/// # Errors
///
/// - `404 Not Found`: Unknown book
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(book_id): Path<i32>,
) -> ApiResult<(StatusCode, Json<AddFavoriteResponse>)> {
    let book = Book::find_by_id(&state.db, book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    let added = FavoriteBook::add(&state.db, auth_user.id, book.id).await?;

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(AddFavoriteResponse { book_id, added })))
}

/// Removes a book from favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(book_id): Path<i32>,
) -> ApiResult<Json<RemoveFavoriteResponse>> {
    let removed = FavoriteBook::remove(&state.db, auth_user.id, book_id).await?;

    Ok(Json(RemoveFavoriteResponse { book_id, removed }))
}
