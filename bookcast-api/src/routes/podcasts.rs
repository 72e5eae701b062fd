/// Podcast endpoints
///
/// Submission is asynchronous: `generate_podcast` inserts a queued row and
/// returns 202 immediately; the worker picks the job up out of band and the
/// client polls status. Reads are owner-scoped, so another user's podcast
/// looks exactly like a missing one. Liking is the one exception and works
/// on any podcast.
///
/// # Endpoints
///
/// - `POST /api/generate-podcast` - Submit a generation job (202)
/// - `GET /api/podcasts` - List own podcasts
/// - `GET /api/podcast/:id` - One podcast (optionally counts a play)
/// - `DELETE /api/podcast/:id` - Delete own podcast and its audio
/// - `POST /api/podcast/:id/like` - Like any podcast

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
    routes::books::{clamp_pagination, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use bookcast_shared::models::{
    podcast::{CreatePodcast, Podcast, PodcastStatus},
    Book,
};
use bookcast_shared::storage::ArtifactStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_PER_PAGE: i64 = 10;
const DEFAULT_DURATION_MINUTES: i32 = 5;
const MAX_DURATION_MINUTES: i32 = 30;

/// Generation request
#[derive(Debug, Deserialize)]
pub struct GeneratePodcastRequest {
    pub book_id: i32,

    /// Optional display title; defaults to one built from the book title
    pub title: Option<String>,

    pub description: Option<String>,

    /// Requested audio length in minutes, 1 to 30, default 5
    pub duration_minutes: Option<i32>,
}

/// Generation response: the job was accepted, not completed
#[derive(Debug, Serialize)]
pub struct GeneratePodcastResponse {
    pub podcast_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Podcast as presented by the API.
///
/// `audio_url` is the public URL path, derived from the stored file name.
#[derive(Debug, Serialize)]
pub struct PodcastView {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub status: String,
    pub audio_url: Option<String>,
    pub file_size: Option<i64>,
    pub error_message: Option<String>,
    pub like_count: i32,
    pub play_count: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Podcast> for PodcastView {
    fn from(p: Podcast) -> Self {
        let audio_url = p.audio_path.as_deref().map(ArtifactStore::public_url);

        PodcastView {
            id: p.id,
            book_id: p.book_id,
            title: p.title,
            description: p.description,
            duration_minutes: p.duration_minutes,
            status: p.status,
            audio_url,
            file_size: p.file_size,
            error_message: p.error_message,
            like_count: p.like_count,
            play_count: p.play_count,
            created_at: p.created_at,
            started_at: p.started_at,
            completed_at: p.completed_at,
        }
    }
}

/// Podcast list query parameters
#[derive(Debug, Deserialize)]
pub struct ListPodcastsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,

    /// Status filter; "all" or absent means no filter
    pub status: Option<String>,
}

/// Podcast list response
#[derive(Debug, Serialize)]
pub struct ListPodcastsResponse {
    pub podcasts: Vec<PodcastView>,
    pub pagination: Pagination,
}

/// Single podcast response
#[derive(Debug, Serialize)]
pub struct PodcastResponse {
    pub podcast: PodcastView,
}

/// Single podcast query parameters
#[derive(Debug, Deserialize)]
pub struct GetPodcastQuery {
    /// When true, the read also counts as one play
    pub play: Option<bool>,
}

/// Like response
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i32,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted_id: Uuid,
}

/// Submits a podcast generation job
///
/// Every submission creates a new independent job, even for a book the
/// user already generated. Returns 202 Accepted with the job in `queued`.
///
/// # Errors
///
/// - `400 Bad Request`: Duration out of range
/// - `404 Not Found`: Unknown book
pub async fn generate_podcast(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<GeneratePodcastRequest>,
) -> ApiResult<(StatusCode, Json<GeneratePodcastResponse>)> {
    let duration = req.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    if !(1..=MAX_DURATION_MINUTES).contains(&duration) {
        return Err(ApiError::BadRequest(format!(
            "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}"
        )));
    }

    let book = Book::find_by_id(&state.db, req.book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Bookcast: {}", book.title));

    let description = req.description.or_else(|| {
        Some(format!(
            "A {duration}-minute podcast about {} by {}",
            book.title, book.author
        ))
    });

    let podcast = Podcast::create(
        &state.db,
        CreatePodcast {
            user_id: auth_user.id,
            book_id: book.id,
            title,
            description,
            duration_minutes: duration,
        },
    )
    .await?;

    tracing::info!(
        podcast_id = %podcast.id,
        user_id = %auth_user.id,
        book_id = book.id,
        "Podcast generation queued"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(GeneratePodcastResponse {
            podcast_id: podcast.id,
            status: podcast.status,
            created_at: podcast.created_at,
        }),
    ))
}

/// Lists the authenticated user's podcasts, newest first
pub async fn list_podcasts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListPodcastsQuery>,
) -> ApiResult<Json<ListPodcastsResponse>> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page, DEFAULT_PER_PAGE);

    let status = match query.status.as_deref() {
        None | Some("all") | Some("") => None,
        Some(s) => {
            // Reject unknown status names rather than silently matching nothing
            let parsed = PodcastStatus::parse(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status: {s}")))?;
            Some(parsed.as_str())
        }
    };

    let total = Podcast::count_by_user(&state.db, auth_user.id, status).await?;
    let podcasts = Podcast::list_by_user(
        &state.db,
        auth_user.id,
        status,
        per_page,
        (page - 1) * per_page,
    )
    .await?;

    Ok(Json(ListPodcastsResponse {
        podcasts: podcasts.into_iter().map(PodcastView::from).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// Returns one of the authenticated user's podcasts
///
/// With `?play=true` the read also increments the play counter.
pub async fn get_podcast(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(podcast_id): Path<Uuid>,
    Query(query): Query<GetPodcastQuery>,
) -> ApiResult<Json<PodcastResponse>> {
    let podcast = Podcast::find_by_id_and_user(&state.db, podcast_id, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Podcast not found".to_string()))?;

    let podcast = if query.play.unwrap_or(false) {
        Podcast::record_play(&state.db, podcast.id).await?;
        // Re-read so the response reflects the new count
        Podcast::find_by_id_and_user(&state.db, podcast_id, auth_user.id)
            .await?
            .unwrap_or(podcast)
    } else {
        podcast
    };

    Ok(Json(PodcastResponse {
        podcast: podcast.into(),
    }))
}

/// Deletes one of the authenticated user's podcasts
///
/// The audio artifact is removed best-effort after the row; a failed file
/// delete never blocks the API delete.
///
/// # Errors
///
/// - `403 Forbidden`: Podcast belongs to another user
/// - `404 Not Found`: No such podcast
pub async fn delete_podcast(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(podcast_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let podcast = Podcast::find_by_id(&state.db, podcast_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Podcast not found".to_string()))?;

    if podcast.user_id != auth_user.id {
        return Err(ApiError::Forbidden(
            "Cannot delete another user's podcast".to_string(),
        ));
    }

    Podcast::delete(&state.db, podcast.id).await?;

    if let Some(file_name) = &podcast.audio_path {
        state.artifacts.remove(file_name);
    }

    tracing::info!(podcast_id = %podcast.id, user_id = %auth_user.id, "Podcast deleted");

    Ok(Json(DeleteResponse {
        deleted_id: podcast.id,
    }))
}

/// Likes a podcast
///
/// Open to any authenticated user on any podcast, own or not, any status.
pub async fn like_podcast(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(podcast_id): Path<Uuid>,
) -> ApiResult<Json<LikeResponse>> {
    let likes = Podcast::increment_likes(&state.db, podcast_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Podcast not found".to_string()))?;

    Ok(Json(LikeResponse { likes }))
}
