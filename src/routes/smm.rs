//! SMM route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn smm_routes() -> Router<AppState> {
    Router::new()
        .route("/api/smm/services", get(list_offerings))
        .route("/api/smm/services/:id/quote", get(quote_offering))
        .route("/api/smm/orders", post(place_smm_order))
}
