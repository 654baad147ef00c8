//! Wallet route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/wallet", get(get_balances))
        .route("/api/wallet/deposit", post(deposit))
        .route("/api/wallet/transactions", get(transaction_history))
}
