//! Gift-card route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn giftcard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/gift-cards", get(list_cards))
        .route("/api/gift-cards", post(sell_card))
        .route("/api/gift-cards/mine", get(my_listings))
        .route("/api/gift-cards/:id/buy", post(buy_card))
        .route("/api/gift-cards/:id/code", get(reveal_code))
}
