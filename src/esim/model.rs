//! eSIM models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// eSIM plan row
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct EsimPlan {
    pub id: Uuid,
    pub country: String,
    pub provider: String,
    pub data_amount: String,
    pub validity_days: i32,
    pub price: i64,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

/// eSIM plan availability
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "plan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Available,
    Sold,
}

/// Query parameters for browsing plans
#[derive(Debug, Deserialize, Default)]
pub struct ListPlansQuery {
    pub country: Option<String>,
    pub q: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Result of a successful plan purchase
#[derive(Debug, Serialize)]
pub struct EsimPurchaseReceipt {
    pub order: crate::orders::Order,
    pub plan: EsimPlan,
}
