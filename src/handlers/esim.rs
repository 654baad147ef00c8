//! eSIM HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::esim::{EsimPlan, EsimPurchaseReceipt, ListPlansQuery};
use crate::handlers::{AdminUser, AuthenticatedUser};
use crate::state::AppState;

/// GET /api/esims - Browse available plans
pub async fn list_plans(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<Vec<EsimPlan>>, ApiError> {
    let plans = state.esim_service.list(query).await?;

    Ok(Json(plans))
}

/// POST /api/esims/:id/buy - Buy a plan
pub async fn buy_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(plan_id): Path<Uuid>,
) -> Result<(StatusCode, Json<EsimPurchaseReceipt>), ApiError> {
    let receipt = state.esim_service.purchase(user.user_id, plan_id).await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Request body for seeding a plan
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 2, max = 64))]
    pub country: String,
    #[validate(length(min = 1, max = 64))]
    pub provider: String,
    #[validate(length(min = 1, max = 32))]
    pub data_amount: String,
    #[validate(range(min = 1))]
    pub validity_days: i32,
    #[validate(range(min = 1))]
    pub price: i64,
}

/// POST /api/esims - Add a plan to the catalog (admin)
pub async fn create_plan(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<EsimPlan>), ApiError> {
    req.validate()?;

    let plan = state
        .esim_service
        .create_plan(
            &req.country,
            &req.provider,
            &req.data_amount,
            req.validity_days,
            req.price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}
