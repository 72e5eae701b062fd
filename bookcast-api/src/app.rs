/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use bookcast_shared::auth;
use bookcast_shared::storage::ArtifactStore;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Handle to the audio artifact directory
    pub artifacts: ArtifactStore,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let artifacts = ArtifactStore::new(&config.audio_dir);

        Self {
            db,
            config: Arc::new(config),
            artifacts,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Authenticated user identity, injected by [`jwt_auth_layer`]
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// User ID from the validated token
    pub id: Uuid,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /audio/*                        # Generated audio files (static)
/// └── /api/
///     ├── GET  /health                # Liveness + database check (public)
///     ├── GET  /status                # Service statistics (public)
///     ├── POST /register              # Create account (public)
///     ├── POST /login                 # Authenticate (public)
///     ├── POST /validate-token        # Check a token (public)
///     ├── POST /check-email           # Email availability (public)
///     └── ... authenticated routes (profile, books, podcasts,
///         favorites, chat), guarded by jwt_auth_layer
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth required
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/status", get(routes::health::status))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/validate-token", post(routes::auth::validate_token))
        .route("/check-email", post(routes::auth::check_email));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/profile", get(routes::profile::get_profile))
        .route("/profile", put(routes::profile::update_profile))
        .route("/change-password", post(routes::profile::change_password))
        .route("/books", get(routes::books::list_books))
        .route("/books/genres", get(routes::books::list_genres))
        .route("/books/:book_id", get(routes::books::get_book))
        .route("/generate-podcast", post(routes::podcasts::generate_podcast))
        .route("/podcasts", get(routes::podcasts::list_podcasts))
        .route("/podcast/:podcast_id", get(routes::podcasts::get_podcast))
        .route(
            "/podcast/:podcast_id",
            delete(routes::podcasts::delete_podcast),
        )
        .route(
            "/podcast/:podcast_id/like",
            post(routes::podcasts::like_podcast),
        )
        .route("/favorites/books", get(routes::favorites::list_favorites))
        .route(
            "/favorites/books/:book_id",
            post(routes::favorites::add_favorite),
        )
        .route(
            "/favorites/books/:book_id",
            delete(routes::favorites::remove_favorite),
        )
        .route("/chat", post(routes::chat::send_message))
        .route("/chat/history", get(routes::chat::get_history))
        .route(
            "/chat/history/:session_id",
            delete(routes::chat::clear_history),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = public_routes.merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(
            bookcast_shared::storage::PUBLIC_PREFIX,
            ServeDir::new(state.artifacts.root()),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects [`AuthUser`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    // Parse Bearer token
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    // Validate token
    let claims = auth::validate_token(token, state.jwt_secret())?;

    // Insert into request extensions
    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
