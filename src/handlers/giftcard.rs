//! Gift-card marketplace HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{
    GiftCard, GiftCardListing, ListCardsQuery, RevealCodeResponse, SellCardRequest,
};
use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::state::AppState;

/// GET /api/gift-cards - Browse available cards
pub async fn list_cards(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListCardsQuery>,
) -> Result<Json<Vec<GiftCardListing>>, ApiError> {
    let listings = state.catalog_service.list(query).await?;

    Ok(Json(listings))
}

/// POST /api/gift-cards - List a card for sale
pub async fn sell_card(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<SellCardRequest>,
) -> Result<(StatusCode, Json<GiftCard>), ApiError> {
    req.validate()?;

    let card = state
        .catalog_service
        .create_listing(user.user_id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/gift-cards/mine - The caller's own listings, any status
pub async fn my_listings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<GiftCard>>, ApiError> {
    let cards = state.catalog_service.listed_by(user.user_id).await?;

    Ok(Json(cards))
}

/// GET /api/gift-cards/:id/code - Reveal the code to the confirmed buyer
pub async fn reveal_code(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<RevealCodeResponse>, ApiError> {
    let code = state
        .catalog_service
        .reveal_code(card_id, user.user_id)
        .await?;

    Ok(Json(RevealCodeResponse { card_id, code }))
}
