//! Order ledger HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::UserRole;
use crate::orders::{ListOrdersQuery, Order};
use crate::state::AppState;

/// GET /api/orders - The caller's orders
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.order_service.list(user.user_id, query).await?;

    Ok(Json(orders))
}

/// GET /api/orders/sales - Gift-card orders where the caller is the seller
pub async fn list_sales(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.order_service.sales_for_seller(user.user_id).await?;

    Ok(Json(orders))
}

/// GET /api/orders/:id - A single order
///
/// Visible to the buyer, the gift-card seller, and admins.
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = state.order_service.get(order_id).await?;

    let is_seller = order
        .details
        .get("seller_id")
        .and_then(|v| v.as_str())
        .map(|s| s == user.user_id.to_string())
        .unwrap_or(false);

    if order.user_id != user.user_id && !is_seller && user.role != UserRole::Admin {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    Ok(Json(order))
}
