//! Escrow coordinator HTTP handlers
//!
//! The four coordinator operations: buy (reserve-and-pay), confirm,
//! dispute, and admin resolution.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::escrow::{ReserveReceipt, ResolveDisputeRequest, SettlementReceipt};
use crate::handlers::{AdminUser, AuthenticatedUser};
use crate::state::AppState;

/// POST /api/gift-cards/:id/buy - Reserve a card and hold the price in escrow
pub async fn buy_card(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(card_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReserveReceipt>), ApiError> {
    let receipt = state
        .escrow_service
        .reserve_and_pay(user.user_id, card_id)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /api/escrow/:order_id/confirm - Seller confirms the sale
pub async fn confirm_settlement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<SettlementReceipt>, ApiError> {
    let receipt = state
        .escrow_service
        .confirm_settlement(user.user_id, order_id)
        .await?;

    Ok(Json(receipt))
}

/// POST /api/escrow/:order_id/dispute - Buyer or seller contests the sale
pub async fn flag_dispute(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<SettlementReceipt>, ApiError> {
    let receipt = state
        .escrow_service
        .flag_dispute(user.user_id, order_id)
        .await?;

    Ok(Json(receipt))
}

/// POST /api/escrow/:order_id/resolve - Admin decides a dispute
pub async fn resolve_dispute(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(order_id): Path<Uuid>,
    Json(req): Json<ResolveDisputeRequest>,
) -> Result<Json<SettlementReceipt>, ApiError> {
    let receipt = state
        .escrow_service
        .resolve_dispute(order_id, req.resolution)
        .await?;

    Ok(Json(receipt))
}
