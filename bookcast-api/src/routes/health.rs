/// Health check and service status endpoints
///
/// # Endpoints
///
/// - `GET /api/health` - Liveness plus database and audio storage checks
/// - `GET /api/status` - Service statistics

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use bookcast_shared::db;
use bookcast_shared::models::podcast::{Podcast, PodcastStatus};
use bookcast_shared::models::User;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Audio storage status
    pub audio_storage: String,
}

/// Service status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub user_count: i64,
    pub podcast_count: i64,
    pub podcasts_queued: i64,
    pub podcasts_processing: i64,
}

/// Health check handler
///
/// Reports degraded rather than failing the request when a dependency is
/// down, so monitors still get a parseable body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match db::health_check(&state.db).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            "disconnected"
        }
    };

    let audio_storage = if state.artifacts.root().is_dir() {
        "available"
    } else {
        "unavailable"
    };

    let status = if database == "connected" && audio_storage == "available" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        audio_storage: audio_storage.to_string(),
    })
}

/// Service statistics handler
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let user_count = User::count_all(&state.db).await?;
    let podcast_count = Podcast::count_all(&state.db).await?;
    let podcasts_queued =
        Podcast::count_by_status(&state.db, PodcastStatus::Queued.as_str()).await?;
    let podcasts_processing =
        Podcast::count_by_status(&state.db, PodcastStatus::Processing.as_str()).await?;

    Ok(Json(StatusResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        user_count,
        podcast_count,
        podcasts_queued,
        podcasts_processing,
    }))
}
