//! Phone-number service layer
//!
//! Wraps the reseller client and records an audit order for every purchase.
//! The reseller account funds these purchases, so the wallet is untouched;
//! the order ledger still gets a completed entry.

use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::orders::{Order, OrderError, OrderKind, OrderOutcome, OrderService};
use crate::reseller::{
    price_to_cents, BuyNumberRequest, PhoneActivation, ResellerClient, ResellerError,
};

/// Phone-number flow errors
#[derive(Error, Debug)]
pub enum PhoneError {
    #[error(transparent)]
    Reseller(#[from] ResellerError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Phone-number service
#[derive(Clone)]
pub struct PhoneService {
    db_pool: PgPool,
    client: ResellerClient,
    orders: OrderService,
}

impl PhoneService {
    /// Create a new phone service instance
    pub fn new(db_pool: PgPool, client: ResellerClient, orders: OrderService) -> Self {
        Self {
            db_pool,
            client,
            orders,
        }
    }

    /// Access to the raw client (for the proxy and read endpoints)
    pub fn client(&self) -> &ResellerClient {
        &self.client
    }

    /// Buy an activation number and record the audit order.
    ///
    /// The upstream purchase happens first; if recording the order fails
    /// the activation still exists on the reseller account, which is why
    /// the order write is kept to a single small transaction.
    pub async fn buy_number(
        &self,
        user_id: Uuid,
        request: BuyNumberRequest,
    ) -> Result<(PhoneActivation, Order), PhoneError> {
        let operator = request.operator.as_deref().unwrap_or("any");

        let activation = self
            .client
            .buy_activation(&request.country, operator, &request.product)
            .await?;

        let mut tx = self.db_pool.begin().await?;

        let order = self
            .orders
            .create(
                &mut tx,
                user_id,
                OrderKind::PhoneNumber,
                price_to_cents(activation.price),
                json!({
                    "activation_id": activation.id,
                    "phone": activation.phone,
                    "country": request.country,
                    "product": request.product,
                    "operator": operator,
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
            user_id = %user_id,
            activation_id = activation.id,
            phone = %activation.phone,
            "Phone number purchased"
        );

        Ok((activation, order))
    }
}
