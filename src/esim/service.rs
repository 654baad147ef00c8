//! eSIM service layer - plan catalog and instant purchase
//!
//! Unlike gift cards there is no escrow leg: delivery is immediate, so the
//! debit, the plan sale, and the completed order commit together.

use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::esim::{EsimPlan, EsimPurchaseReceipt, ListPlansQuery, PlanStatus};
use crate::orders::{OrderError, OrderKind, OrderOutcome, OrderService};
use crate::wallet::{
    format_cents, TransactionKind, TransactionStatus, WalletError, WalletService,
};

/// eSIM errors
#[derive(Error, Debug)]
pub enum EsimError {
    #[error("Plan is not available: {0}")]
    PlanNotAvailable(Uuid),

    #[error("Plan not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// eSIM service
#[derive(Clone)]
pub struct EsimService {
    db_pool: PgPool,
    wallet: WalletService,
    orders: OrderService,
}

impl EsimService {
    /// Create a new eSIM service instance
    pub fn new(db_pool: PgPool, wallet: WalletService, orders: OrderService) -> Self {
        Self {
            db_pool,
            wallet,
            orders,
        }
    }

    /// Browse available plans
    pub async fn list(&self, query: ListPlansQuery) -> Result<Vec<EsimPlan>, EsimError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM esim_plans WHERE status = 'available'");

        if let Some(country) = query.country {
            query_builder.push(" AND country = ");
            query_builder.push_bind(country);
        }
        if let Some(q) = query.q {
            let pattern = format!("%{}%", q);
            query_builder.push(" AND (provider ILIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(" OR country ILIKE ");
            query_builder.push_bind(pattern);
            query_builder.push(")");
        }

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit as i64);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset as i64);

        let plans = query_builder
            .build_query_as::<EsimPlan>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(plans)
    }

    /// Get a single plan by ID
    pub async fn get(&self, plan_id: Uuid) -> Result<EsimPlan, EsimError> {
        sqlx::query_as::<_, EsimPlan>("SELECT * FROM esim_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(EsimError::NotFound(plan_id))
    }

    /// Buy a plan: debit, mark sold, record the completed order - one unit.
    pub async fn purchase(
        &self,
        buyer_id: Uuid,
        plan_id: Uuid,
    ) -> Result<EsimPurchaseReceipt, EsimError> {
        let mut tx = self.db_pool.begin().await?;

        let plan: Option<EsimPlan> = sqlx::query_as("SELECT * FROM esim_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&mut *tx)
            .await?;
        let plan = plan.ok_or(EsimError::NotFound(plan_id))?;

        // Balance check before any mutation
        let balances = self.wallet.lock_account(&mut tx, buyer_id).await?;
        if balances.available_balance < plan.price {
            return Err(WalletError::InsufficientFunds {
                required: plan.price,
                available: balances.available_balance,
            }
            .into());
        }

        // Conditional sale decides races for the last plan
        let plan = sqlx::query_as::<_, EsimPlan>(
            r#"
            UPDATE esim_plans
            SET status = 'sold'
            WHERE id = $1 AND status = 'available'
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EsimError::PlanNotAvailable(plan_id))?;

        self.wallet.debit(&mut tx, buyer_id, plan.price).await?;
        self.wallet
            .record(
                &mut tx,
                buyer_id,
                plan.price,
                TransactionKind::Purchase,
                TransactionStatus::Completed,
                &format!(
                    "eSIM purchase - {} {} ({})",
                    plan.provider,
                    plan.data_amount,
                    format_cents(plan.price)
                ),
            )
            .await?;

        let order = self
            .orders
            .create(
                &mut tx,
                buyer_id,
                OrderKind::Esim,
                plan.price,
                json!({
                    "esim_plan_id": plan.id,
                    "country": plan.country,
                    "provider": plan.provider,
                    "data_amount": plan.data_amount,
                }),
            )
            .await?;
        let order = self
            .orders
            .finalize(&mut tx, order.id, OrderOutcome::Completed)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            plan_id = %plan_id,
            buyer_id = %buyer_id,
            amount = plan.price,
            "eSIM plan purchased"
        );

        Ok(EsimPurchaseReceipt { order, plan })
    }

    /// Seed a plan into the catalog (admin)
    pub async fn create_plan(
        &self,
        country: &str,
        provider: &str,
        data_amount: &str,
        validity_days: i32,
        price: i64,
    ) -> Result<EsimPlan, EsimError> {
        let plan = sqlx::query_as::<_, EsimPlan>(
            r#"
            INSERT INTO esim_plans (id, country, provider, data_amount, validity_days, price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(country)
        .bind(provider)
        .bind(data_amount)
        .bind(validity_days)
        .bind(price)
        .bind(PlanStatus::Available)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(plan)
    }
}
