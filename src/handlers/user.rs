//! User profile HTTP handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::{UpdateProfileRequest, UserResponse};
use crate::state::AppState;

/// GET /api/users/me - Current profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = state.auth_service.get_user(user.user_id).await?;

    Ok(Json(profile.into()))
}

/// PATCH /api/users/me - Update profile fields
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = state
        .auth_service
        .update_profile(user.user_id, req.full_name)
        .await?;

    Ok(Json(profile.into()))
}
