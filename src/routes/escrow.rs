//! Escrow route definitions

use axum::{routing::post, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn escrow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/escrow/:order_id/confirm", post(confirm_settlement))
        .route("/api/escrow/:order_id/dispute", post(flag_dispute))
        .route("/api/escrow/:order_id/resolve", post(resolve_dispute))
}
