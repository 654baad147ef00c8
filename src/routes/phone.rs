//! Phone-number route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn phone_routes() -> Router<AppState> {
    Router::new()
        .route("/api/phone/prices", get(get_prices))
        .route("/api/phone/numbers", get(list_numbers))
        .route("/api/phone/numbers", post(buy_number))
        .route("/api/phone/numbers/:id/sms", get(get_sms))
        .route("/api/phone/numbers/:id/cancel", post(cancel_number))
        .route("/api/phone/numbers/:id/finish", post(finish_number))
        .route("/api/reseller/proxy", get(proxy_get))
        .route("/api/reseller/proxy", post(proxy_post))
}
