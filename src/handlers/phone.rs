//! Phone-number HTTP handlers
//!
//! Reseller-backed flows plus the raw pass-through proxy.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::orders::Order;
use crate::reseller::{BuyNumberRequest, PhoneActivation, ProxyQuery, SmsMessage};
use crate::state::AppState;

/// GET /api/phone/prices - Upstream price table
pub async fn get_prices(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let prices = state.phone_service.client().prices().await?;

    Ok(Json(prices))
}

/// Response for a number purchase
#[derive(Debug, serde::Serialize)]
pub struct BuyNumberResponse {
    pub activation: PhoneActivation,
    pub order: Order,
}

/// POST /api/phone/numbers - Buy an activation number
pub async fn buy_number(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<BuyNumberRequest>,
) -> Result<(StatusCode, Json<BuyNumberResponse>), ApiError> {
    let (activation, order) = state.phone_service.buy_number(user.user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(BuyNumberResponse { activation, order }),
    ))
}

/// GET /api/phone/numbers - Purchased numbers on the reseller account
pub async fn list_numbers(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<PhoneActivation>>, ApiError> {
    let activations = state.phone_service.client().activations().await?;

    Ok(Json(activations))
}

/// GET /api/phone/numbers/:id/sms - SMS inbox for an activation
pub async fn get_sms(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(activation_id): Path<i64>,
) -> Result<Json<Vec<SmsMessage>>, ApiError> {
    let activation = state.phone_service.client().check(activation_id).await?;

    Ok(Json(activation.sms))
}

/// POST /api/phone/numbers/:id/cancel - Cancel an activation
pub async fn cancel_number(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(activation_id): Path<i64>,
) -> Result<Json<PhoneActivation>, ApiError> {
    let activation = state.phone_service.client().cancel(activation_id).await?;

    Ok(Json(activation))
}

/// POST /api/phone/numbers/:id/finish - Mark an activation done
pub async fn finish_number(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(activation_id): Path<i64>,
) -> Result<Json<PhoneActivation>, ApiError> {
    let activation = state.phone_service.client().finish(activation_id).await?;

    Ok(Json(activation))
}

/// GET /api/reseller/proxy?endpoint=.. - Raw pass-through (GET)
pub async fn proxy_get(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProxyQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let value = state
        .phone_service
        .client()
        .forward_get(&query.endpoint)
        .await?;

    Ok(Json(value))
}

/// POST /api/reseller/proxy?endpoint=.. - Raw pass-through (POST)
pub async fn proxy_post(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProxyQuery>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let value = state
        .phone_service
        .client()
        .forward_post(&query.endpoint, body)
        .await?;

    Ok(Json(value))
}
