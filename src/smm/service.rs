//! SMM service layer - offering catalog and order placement
//!
//! Placed orders stay pending; an upstream panel worker would complete
//! them. The debit and the order still commit as one unit.

use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::orders::{Order, OrderError, OrderKind, OrderService};
use crate::smm::{quote_cost, ListOfferingsQuery, PlaceSmmOrderRequest, SmmOffering, SmmQuote};
use crate::wallet::{
    format_cents, TransactionKind, TransactionStatus, WalletError, WalletService,
};

/// SMM errors
#[derive(Error, Debug)]
pub enum SmmError {
    #[error("Service not found: {0}")]
    NotFound(Uuid),

    #[error("Quantity {got} outside allowed range {min}..={max}")]
    QuantityOutOfRange { got: i64, min: i64, max: i64 },

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// SMM service
#[derive(Clone)]
pub struct SmmService {
    db_pool: PgPool,
    wallet: WalletService,
    orders: OrderService,
}

impl SmmService {
    /// Create a new SMM service instance
    pub fn new(db_pool: PgPool, wallet: WalletService, orders: OrderService) -> Self {
        Self {
            db_pool,
            wallet,
            orders,
        }
    }

    /// Browse offerings, optionally filtered by platform or text
    pub async fn list(&self, query: ListOfferingsQuery) -> Result<Vec<SmmOffering>, SmmError> {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM smm_services WHERE 1=1");

        if let Some(platform) = query.platform {
            query_builder.push(" AND platform = ");
            query_builder.push_bind(platform.to_lowercase());
        }
        if let Some(q) = query.q {
            let pattern = format!("%{}%", q);
            query_builder.push(" AND (name ILIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(" OR service_type ILIKE ");
            query_builder.push_bind(pattern);
            query_builder.push(")");
        }

        query_builder.push(" ORDER BY platform, name");

        let offerings = query_builder
            .build_query_as::<SmmOffering>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(offerings)
    }

    /// Get a single offering by ID
    pub async fn get(&self, service_id: Uuid) -> Result<SmmOffering, SmmError> {
        sqlx::query_as::<_, SmmOffering>("SELECT * FROM smm_services WHERE id = $1")
            .bind(service_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(SmmError::NotFound(service_id))
    }

    /// Price a quantity without placing an order
    pub async fn quote(&self, service_id: Uuid, quantity: i64) -> Result<SmmQuote, SmmError> {
        let offering = self.get(service_id).await?;
        self.check_quantity(&offering, quantity)?;

        Ok(SmmQuote {
            service_id,
            quantity,
            cost: quote_cost(offering.price_per_1000, quantity),
        })
    }

    /// Place an order: balance check, debit, ledger row, and pending order
    /// commit together.
    pub async fn place_order(
        &self,
        user_id: Uuid,
        request: PlaceSmmOrderRequest,
    ) -> Result<Order, SmmError> {
        let offering = self.get(request.service_id).await?;
        self.check_quantity(&offering, request.quantity)?;

        let cost = quote_cost(offering.price_per_1000, request.quantity);

        let mut tx = self.db_pool.begin().await?;

        let balances = self.wallet.lock_account(&mut tx, user_id).await?;
        if balances.available_balance < cost {
            return Err(WalletError::InsufficientFunds {
                required: cost,
                available: balances.available_balance,
            }
            .into());
        }

        self.wallet.debit(&mut tx, user_id, cost).await?;
        self.wallet
            .record(
                &mut tx,
                user_id,
                cost,
                TransactionKind::Purchase,
                TransactionStatus::Completed,
                &format!(
                    "SMM order - {} x{} ({})",
                    offering.name,
                    request.quantity,
                    format_cents(cost)
                ),
            )
            .await?;

        let order = self
            .orders
            .create(
                &mut tx,
                user_id,
                OrderKind::Smm,
                cost,
                json!({
                    "service_id": offering.id,
                    "service_name": offering.name,
                    "platform": offering.platform,
                    "quantity": request.quantity,
                    "link": request.link,
                }),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            service_id = %offering.id,
            user_id = %user_id,
            amount = cost,
            "SMM order placed"
        );

        Ok(order)
    }

    fn check_quantity(&self, offering: &SmmOffering, quantity: i64) -> Result<(), SmmError> {
        if quantity < offering.min_quantity || quantity > offering.max_quantity {
            return Err(SmmError::QuantityOutOfRange {
                got: quantity,
                min: offering.min_quantity,
                max: offering.max_quantity,
            });
        }
        Ok(())
    }
}
