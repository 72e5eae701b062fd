/// Integration tests for the Bookcast API
///
/// These tests verify the HTTP surface end-to-end against a real database:
/// - Registration and login flow
/// - Catalog reads
/// - Podcast submission and owner scoping
/// - Favorites idempotency
/// - Chat round trips
///
/// Run with: cargo test --test integration_test -- --test-threads=1
///
/// Requires DATABASE_URL and JWT_SECRET in the environment (or .env).

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, create_test_user, TestContext};
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

#[tokio::test]
async fn test_register_then_login() {
    let mut ctx = TestContext::new().await.unwrap();
    let email = format!("register-{}@example.com", Uuid::new_v4());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "New Reader",
                "email": email,
                "password": "Sup3rSecret!"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert!(
        body["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    // The new credentials work immediately
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "Sup3rSecret!" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": ctx.user.email, "password": "WrongPassw0rd!" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert!(body.get("token").is_none(), "no token on failed login");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Copycat",
                "email": ctx.user.email,
                "password": "Sup3rSecret!"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/profile")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_books_catalog() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(Method::GET, "/api/books?per_page=5", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let books = body["books"].as_array().unwrap();
    assert!(!books.is_empty());
    assert!(books.len() <= 5);
    assert!(body["pagination"]["total"].as_i64().unwrap() >= 12);

    // Genre filter is case-insensitive
    let request = ctx.request(Method::GET, "/api/books?genre=romance", None);
    let response = ctx.app.call(request).await.unwrap();
    let body = body_json(response).await;
    for book in body["books"].as_array().unwrap() {
        assert_eq!(book["genre"], "Romance");
    }

    let request = ctx.request(Method::GET, "/api/books/1", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = ctx.request(Method::GET, "/api/books/999999", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_podcast_is_accepted_queued() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(
        Method::POST,
        "/api/generate-podcast",
        Some(json!({ "book_id": 1, "duration_minutes": 5 })),
    );
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "queued");
    let podcast_id = body["podcast_id"].as_str().unwrap().to_string();

    // The submitter can poll it
    let request = ctx.request(Method::GET, &format!("/api/podcast/{podcast_id}"), None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["podcast"]["status"], "queued");
    assert!(body["podcast"]["audio_url"].is_null());
}

#[tokio::test]
async fn test_generate_podcast_rejects_bad_input() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(
        Method::POST,
        "/api/generate-podcast",
        Some(json!({ "book_id": 1, "duration_minutes": 31 })),
    );
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = ctx.request(
        Method::POST,
        "/api/generate-podcast",
        Some(json!({ "book_id": 999999 })),
    );
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_podcast_reads_are_owner_scoped() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(
        Method::POST,
        "/api/generate-podcast",
        Some(json!({ "book_id": 2 })),
    );
    let response = ctx.app.call(request).await.unwrap();
    let body = body_json(response).await;
    let podcast_id = body["podcast_id"].as_str().unwrap().to_string();

    // Another user sees 404 on read but 403 on delete
    let other = create_test_user(&ctx.db, "Other User").await.unwrap();
    let other_token = bookcast_shared::auth::create_token(
        &bookcast_shared::auth::Claims::new(other.id),
        &ctx.config.jwt.secret,
    )
    .unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/podcast/{podcast_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {other_token}"))
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/podcast/{podcast_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {other_token}"))
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Liking someone else's podcast is allowed
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/podcast/{podcast_id}/like"))
        .header(header::AUTHORIZATION, format!("Bearer {other_token}"))
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["likes"], 1);

    // The owner can delete, after which the record is gone
    let request = ctx.request(Method::DELETE, &format!("/api/podcast/{podcast_id}"), None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = ctx.request(Method::GET, &format!("/api/podcast/{podcast_id}"), None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_are_idempotent() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(Method::POST, "/api/favorites/books/3", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["added"], true);

    // Re-adding reports no change but still succeeds
    let request = ctx.request(Method::POST, "/api/favorites/books/3", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["added"], false);

    let request = ctx.request(Method::GET, "/api/favorites/books", None);
    let response = ctx.app.call(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);

    let request = ctx.request(Method::DELETE, "/api/favorites/books/3", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(body_json(response).await["removed"], true);

    // Removing again is a quiet no-op
    let request = ctx.request(Method::DELETE, "/api/favorites/books/3", None);
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["removed"], false);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = ctx.request(
        Method::POST,
        "/api/chat",
        Some(json!({ "message": "Tell me about Frankenstein" })),
    );
    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let reply = body["response"].as_str().unwrap();
    assert!(reply.contains("Frankenstein"));
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // Both turns landed in history, oldest first
    let request = ctx.request(
        Method::GET,
        &format!("/api/chat/history?session_id={session_id}"),
        None,
    );
    let response = ctx.app.call(request).await.unwrap();
    let body = body_json(response).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["is_user"], true);
    assert_eq!(history[1]["is_user"], false);

    let request = ctx.request(
        Method::DELETE,
        &format!("/api/chat/history/{session_id}"),
        None,
    );
    let response = ctx.app.call(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["deleted"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
