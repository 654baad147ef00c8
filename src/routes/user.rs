//! User route definitions

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/me", get(get_profile))
        .route("/api/users/me", patch(update_profile))
}
