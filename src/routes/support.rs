//! Support route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn support_routes() -> Router<AppState> {
    Router::new()
        .route("/api/support/tickets", get(list_tickets))
        .route("/api/support/tickets", post(create_ticket))
        .route("/api/support/tickets/:id", get(get_thread))
        .route("/api/support/tickets/:id/replies", post(add_reply))
        .route("/api/support/tickets/:id/close", post(close_ticket))
}
