//! SMM HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::orders::Order;
use crate::smm::{ListOfferingsQuery, PlaceSmmOrderRequest, SmmOffering, SmmQuote};
use crate::state::AppState;

/// GET /api/smm/services - Browse offerings
pub async fn list_offerings(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListOfferingsQuery>,
) -> Result<Json<Vec<SmmOffering>>, ApiError> {
    let offerings = state.smm_service.list(query).await?;

    Ok(Json(offerings))
}

/// Query string for quoting
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub quantity: i64,
}

/// GET /api/smm/services/:id/quote - Price a quantity
pub async fn quote_offering(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(service_id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<SmmQuote>, ApiError> {
    let quote = state.smm_service.quote(service_id, query.quantity).await?;

    Ok(Json(quote))
}

/// POST /api/smm/orders - Place an order
pub async fn place_smm_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<PlaceSmmOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    req.validate()?;

    let order = state.smm_service.place_order(user.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(order)))
}
