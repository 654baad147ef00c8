//! eSIM route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn esim_routes() -> Router<AppState> {
    Router::new()
        .route("/api/esims", get(list_plans))
        .route("/api/esims", post(create_plan))
        .route("/api/esims/:id/buy", post(buy_plan))
}
