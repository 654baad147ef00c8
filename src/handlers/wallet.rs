//! Wallet HTTP handlers
//!
//! Balance lookup, top-up, and the transaction ledger.

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::state::AppState;
use crate::wallet::{Balances, DepositRequest, HistoryQuery, WalletTransaction};

/// GET /api/wallet - Current balances
pub async fn get_balances(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Balances>, ApiError> {
    let balances = state.wallet_service.balances(user.user_id).await?;

    Ok(Json(balances))
}

/// POST /api/wallet/deposit - Top up the available balance
pub async fn deposit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<DepositRequest>,
) -> Result<Json<Balances>, ApiError> {
    req.validate()?;

    let balances = state
        .wallet_service
        .deposit(user.user_id, req.amount)
        .await?;

    Ok(Json(balances))
}

/// GET /api/wallet/transactions - Recent ledger entries
pub async fn transaction_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WalletTransaction>>, ApiError> {
    let entries = state
        .wallet_service
        .history(user.user_id, query.limit.unwrap_or(20))
        .await?;

    Ok(Json(entries))
}
