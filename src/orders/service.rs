//! Order ledger service layer
//!
//! Orders are the audit trail of purchase intents. `create` always
//! succeeds for well-formed input; `finalize` is a one-way conditional
//! update so a second call cannot double-apply.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::orders::{ListOrdersQuery, Order, OrderKind, OrderOutcome, OrderStatus};

/// Order ledger errors
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Order already finalized: {0}")]
    AlreadyFinalized(Uuid),

    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Order ledger service
#[derive(Clone)]
pub struct OrderService {
    db_pool: PgPool,
}

impl OrderService {
    /// Create a new order service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Append a purchase intent (status = pending)
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        kind: OrderKind,
        amount: i64,
        details: serde_json::Value,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, user_id, kind, amount, status, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(amount)
        .bind(OrderStatus::Pending)
        .bind(details)
        .fetch_one(&mut *conn)
        .await?;

        Ok(order)
    }

    /// Move a pending order to its terminal status.
    ///
    /// Calling this twice yields `AlreadyFinalized` on the second call.
    pub async fn finalize(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
        outcome: OrderOutcome,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2, finalized_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(outcome.status())
        .fetch_optional(&mut *conn)
        .await?;

        match order {
            Some(order) => Ok(order),
            None => {
                let exists: Option<(OrderStatus,)> =
                    sqlx::query_as("SELECT status FROM orders WHERE id = $1")
                        .bind(order_id)
                        .fetch_optional(&mut *conn)
                        .await?;

                match exists {
                    Some(_) => Err(OrderError::AlreadyFinalized(order_id)),
                    None => Err(OrderError::NotFound(order_id)),
                }
            }
        }
    }

    /// Get a single order by ID
    pub async fn get(&self, order_id: Uuid) -> Result<Order, OrderError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }

    /// Lock an order row for a settlement decision
    pub async fn get_for_update(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
    ) -> Result<Order, OrderError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }

    /// List a user's orders with filtering and pagination
    pub async fn list(
        &self,
        user_id: Uuid,
        query: ListOrdersQuery,
    ) -> Result<Vec<Order>, OrderError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM orders WHERE user_id = ");
        query_builder.push_bind(user_id);

        if let Some(kind) = query.kind {
            query_builder.push(" AND kind = ");
            query_builder.push_bind(kind);
        }
        if let Some(status) = query.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit as i64);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset as i64);

        let orders = query_builder
            .build_query_as::<Order>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(orders)
    }

    /// Gift-card orders where the caller is the selling side, newest
    /// first. Sellers confirm or dispute from this view.
    pub async fn sales_for_seller(&self, seller_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE kind = 'gift_card' AND details->>'seller_id' = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(seller_id.to_string())
        .fetch_all(&self.db_pool)
        .await?;

        Ok(orders)
    }

    /// Find the pending gift-card order referencing a card
    pub async fn find_pending_for_card(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
    ) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE kind = 'gift_card'
              AND status = 'pending'
              AND details->>'gift_card_id' = $1
            "#,
        )
        .bind(card_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }
}
