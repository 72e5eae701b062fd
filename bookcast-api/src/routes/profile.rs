/// Profile management endpoints
///
/// # Endpoints
///
/// - `GET /api/profile` - Current user's profile
/// - `PUT /api/profile` - Update name, email, or bio
/// - `POST /api/change-password` - Change password (requires current one)

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use bookcast_shared::{
    auth,
    models::user::{UpdateProfile, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Returns the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse { user }))
}

/// Updates profile fields
///
/// # Errors
///
/// - `409 Conflict`: New email belongs to another user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate()?;

    // Re-submitting one's own email is fine; only other users' emails conflict
    if let Some(email) = &req.email {
        if User::email_taken_by_other(&state.db, email, auth_user.id).await? {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }
    }

    let user = User::update_profile(
        &state.db,
        auth_user.id,
        UpdateProfile {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email,
            bio: req.bio,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(ProfileResponse { user }))
}

/// Changes the password after verifying the current one
///
/// # Errors
///
/// - `401 Unauthorized`: Current password is wrong
/// - `422 Unprocessable Entity`: New password too weak
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = User::find_by_id(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = auth::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    auth::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "new_password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = auth::hash_password(&req.new_password)?;
    User::update_password(&state.db, auth_user.id, &password_hash).await?;

    tracing::info!(user_id = %auth_user.id, "Password changed");

    Ok(Json(
        serde_json::json!({ "message": "Password changed successfully" }),
    ))
}
