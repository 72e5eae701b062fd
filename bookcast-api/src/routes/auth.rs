/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (with immediate login)
/// - Login
/// - Token validation
/// - Logout
/// - Email availability check
///
/// Tokens are stateless 24 hour bearer tokens; logout only records a
/// timestamp on the user row.
///
/// # Endpoints
///
/// - `POST /api/register` - Register new user
/// - `POST /api/login` - Login and get a token
/// - `POST /api/validate-token` - Validate a token
/// - `POST /api/logout` - Record logout (authenticated)
/// - `POST /api/check-email` - Check email availability

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use bookcast_shared::{
    auth::{self, Claims},
    models::user::{CreateUser, User},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user (password hash is never serialized)
    pub user: User,

    /// Bearer token, valid for 24 hours
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token validation request
#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

/// Token validation response
#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,

    pub user: User,

    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

/// Email availability request
#[derive(Debug, Deserialize, Validate)]
pub struct CheckEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Email availability response
#[derive(Debug, Serialize)]
pub struct CheckEmailResponse {
    pub exists: bool,
}

/// Register a new user
///
/// Creates an account and returns a token for immediate login.
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Validate password strength beyond minimum length
    auth::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    if User::email_exists(&state.db, &req.email).await? {
        return Err(ApiError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let token = auth::create_token(&Claims::new(user.id), state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login
///
/// Authenticates with email and password, returning a 24 hour token.
/// Wrong email and wrong password are indistinguishable in the response.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = auth::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::touch_last_login(&state.db, user.id).await?;

    let token = auth::create_token(&Claims::new(user.id), state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse { user, token }))
}

/// Validate a token
///
/// Checks signature, expiration, and issuer, and confirms the user still
/// exists.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired token
/// - `404 Not Found`: Token is valid but the user is gone
pub async fn validate_token(
    State(state): State<AppState>,
    Json(req): Json<ValidateTokenRequest>,
) -> ApiResult<Json<ValidateTokenResponse>> {
    if req.token.is_empty() {
        return Err(ApiError::BadRequest("Token is required".to_string()));
    }

    let claims = auth::validate_token(&req.token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ValidateTokenResponse {
        valid: true,
        user,
        expires_at: claims.expires_at(),
    }))
}

/// Logout
///
/// Records the logout timestamp. The token itself stays valid until it
/// expires; clients are expected to discard it.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    User::touch_last_logout(&state.db, auth_user.id).await?;

    tracing::info!(user_id = %auth_user.id, "User logged out");

    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

/// Check whether an email is already registered
pub async fn check_email(
    State(state): State<AppState>,
    Json(req): Json<CheckEmailRequest>,
) -> ApiResult<Json<CheckEmailResponse>> {
    req.validate()?;

    let exists = User::email_exists(&state.db, &req.email).await?;

    Ok(Json(CheckEmailResponse { exists }))
}
