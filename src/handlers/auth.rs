//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::{AuthTokenResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;

/// POST /api/auth/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthTokenResponse>), ApiError> {
    req.validate()?;

    let tokens = state
        .auth_service
        .register(&req.email, &req.password, req.full_name)
        .await?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /api/auth/login - Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    let tokens = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(tokens))
}

/// GET /api/auth/me - The authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = state.auth_service.get_user(user.user_id).await?;

    Ok(Json(profile.into()))
}
