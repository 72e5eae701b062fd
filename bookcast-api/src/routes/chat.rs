/// Chat assistant endpoints
///
/// Each POST persists the user turn, produces a reply with the keyword
/// responder, persists the assistant turn, and returns the reply. Turns are
/// grouped by a session ID the client may supply; a fresh one is generated
/// otherwise.
///
/// # Endpoints
///
/// - `POST /api/chat` - Send a message, get a reply
/// - `GET /api/chat/history` - List past turns (optionally one session)
/// - `DELETE /api/chat/history/:session_id` - Clear one session

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
    responder,
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use bookcast_shared::models::chat::{ChatMessage, CreateChatMessage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    /// Existing session to continue; a new one is generated if absent
    pub session_id: Option<String>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply
    pub response: String,

    /// ID of the persisted assistant turn
    pub message_id: Uuid,

    /// Session the turns were recorded under
    pub session_id: String,
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub session_id: Option<String>,
    pub limit: Option<i64>,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatMessage>,
}

/// Clear response
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub session_id: String,
    pub deleted: u64,
}

/// Sends a message to the assistant
///
/// Both turns are persisted; the user turn first, so even a failed reply
/// leaves the question in history.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    ChatMessage::create(
        &state.db,
        CreateChatMessage {
            user_id: auth_user.id,
            session_id: session_id.clone(),
            message: message.clone(),
            is_user: true,
        },
    )
    .await?;

    let reply = responder::respond(&state.db, &message).await?;

    let assistant_turn = ChatMessage::create(
        &state.db,
        CreateChatMessage {
            user_id: auth_user.id,
            session_id: session_id.clone(),
            message: reply.clone(),
            is_user: false,
        },
    )
    .await?;

    Ok(Json(ChatResponse {
        response: reply,
        message_id: assistant_turn.id,
        session_id,
    }))
}

/// Lists past chat turns, oldest first
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let history = ChatMessage::list_by_user(
        &state.db,
        auth_user.id,
        query.session_id.as_deref(),
        limit,
    )
    .await?;

    Ok(Json(HistoryResponse { history }))
}

/// Clears all of the user's turns in one session
pub async fn clear_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ClearHistoryResponse>> {
    let deleted = ChatMessage::clear_session(&state.db, auth_user.id, &session_id).await?;

    Ok(Json(ClearHistoryResponse {
        session_id,
        deleted,
    }))
}
