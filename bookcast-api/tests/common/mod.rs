/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup with migrations
/// - Test user creation
/// - JWT token generation
/// - Request helpers
///
/// Tests require a running PostgreSQL database, configured via
/// DATABASE_URL, plus a JWT_SECRET of at least 32 characters.

use axum::body::Body;
use axum::http::{header, Method, Request};
use bookcast_api::app::{build_router, AppState};
use bookcast_api::config::Config;
use bookcast_shared::auth::{create_token, hash_password, Claims};
use bookcast_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,

    // Holds the artifact directory alive for the test's duration
    _audio_dir: tempfile::TempDir,
}

impl TestContext {
    /// Creates a new test context with a fresh test user
    pub async fn new() -> anyhow::Result<Self> {
        let mut config = Config::from_env()?;

        let audio_dir = tempfile::tempdir()?;
        config.audio_dir = audio_dir.path().to_path_buf();

        let db = PgPool::connect(&config.database.url).await?;
        bookcast_shared::db::run_migrations(&db).await?;

        let user = create_test_user(&db, "Test User").await?;
        let jwt_token = create_token(&Claims::new(user.id), &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        state.artifacts.ensure_dir()?;
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
            _audio_dir: audio_dir,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Builds an authenticated JSON request
    pub fn request(&self, method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::CONTENT_TYPE, "application/json");

        match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

/// Creates a user with a unique email and a real password hash
pub async fn create_test_user(db: &PgPool, name: &str) -> anyhow::Result<User> {
    let password_hash = hash_password("Sup3rSecret!")?;

    let user = User::create(
        db,
        CreateUser {
            name: name.to_string(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash,
        },
    )
    .await?;

    Ok(user)
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}
