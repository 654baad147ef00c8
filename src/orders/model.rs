//! Order models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Purchase order. Created once per purchase attempt; immutable except for
/// `status`, which moves one way out of `pending`.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: OrderKind,
    pub amount: i64,
    pub status: OrderStatus,
    /// Opaque payload referencing the purchased item
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

/// What was purchased
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "order_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    PhoneNumber,
    Esim,
    GiftCard,
    Smm,
}

/// Order lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    /// Completed and failed orders never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

/// Terminal outcome passed to `finalize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOutcome {
    Completed,
    Failed,
}

impl OrderOutcome {
    pub fn status(self) -> OrderStatus {
        match self {
            OrderOutcome::Completed => OrderStatus::Completed,
            OrderOutcome::Failed => OrderStatus::Failed,
        }
    }
}

/// Query parameters for listing a user's orders
#[derive(Debug, Deserialize, Default)]
pub struct ListOrdersQuery {
    pub kind: Option<OrderKind>,
    pub status: Option<OrderStatus>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(OrderOutcome::Completed.status(), OrderStatus::Completed);
        assert_eq!(OrderOutcome::Failed.status(), OrderStatus::Failed);
    }
}
