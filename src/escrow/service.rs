//! Escrow coordinator - the transactional heart of the marketplace
//!
//! Every public operation here is one database transaction. A failure at
//! any step drops the transaction, which rolls back every prior write: a
//! debit can never be left applied without its reservation, and a
//! settlement can never pay the seller without flipping the card.
//!
//! Lock discipline: user rows are locked (`FOR UPDATE`) before card rows
//! are touched, buyer before seller; card state changes ride on
//! conditional updates, so racing callers resolve to exactly one winner.

use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{CardStatus, CatalogError, CatalogService, GiftCard, SettleOutcome};
use crate::escrow::{DisputeResolution, ReserveReceipt, SettlementReceipt};
use crate::orders::{Order, OrderError, OrderKind, OrderOutcome, OrderService, OrderStatus};
use crate::wallet::{
    format_cents, TransactionKind, TransactionStatus, WalletError, WalletService,
};

/// Escrow coordinator errors
#[derive(Error, Debug)]
pub enum EscrowError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid order payload: {0}")]
    InvalidOrder(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Escrow coordinator service
#[derive(Clone)]
pub struct EscrowService {
    db_pool: PgPool,
    wallet: WalletService,
    catalog: CatalogService,
    orders: OrderService,
}

impl EscrowService {
    /// Create a new escrow coordinator instance
    pub fn new(
        db_pool: PgPool,
        wallet: WalletService,
        catalog: CatalogService,
        orders: OrderService,
    ) -> Self {
        Self {
            db_pool,
            wallet,
            catalog,
            orders,
        }
    }

    /// Buy a gift card: debit the buyer into escrow, reserve the card, and
    /// open the order - all or nothing.
    pub async fn reserve_and_pay(
        &self,
        buyer_id: Uuid,
        card_id: Uuid,
    ) -> Result<ReserveReceipt, EscrowError> {
        let mut tx = self.db_pool.begin().await?;

        let card: Option<GiftCard> = sqlx::query_as("SELECT * FROM gift_cards WHERE id = $1")
            .bind(card_id)
            .fetch_optional(&mut *tx)
            .await?;
        let card = card.ok_or(CatalogError::NotFound(card_id))?;

        if card.seller_id == buyer_id {
            return Err(EscrowError::Forbidden(
                "Sellers cannot buy their own listing".to_string(),
            ));
        }

        let price = card.asking_price;

        // Step 1: balance check before any mutation. An early return here
        // drops the transaction with nothing written.
        let balances = self.wallet.lock_account(&mut tx, buyer_id).await?;
        if balances.available_balance < price {
            return Err(WalletError::InsufficientFunds {
                required: price,
                available: balances.available_balance,
            }
            .into());
        }

        // Step 2: reservation is the race arbiter. A lost race aborts the
        // whole unit - the debit below never happens.
        let card = self.catalog.reserve(&mut tx, card_id, buyer_id).await?;

        self.wallet.move_to_escrow(&mut tx, buyer_id, price).await?;
        self.wallet
            .record(
                &mut tx,
                buyer_id,
                price,
                TransactionKind::Purchase,
                TransactionStatus::Completed,
                &format!(
                    "Gift card purchase - {} {} (escrow hold)",
                    card.card_type,
                    format_cents(card.face_value)
                ),
            )
            .await?;

        let order = self
            .orders
            .create(
                &mut tx,
                buyer_id,
                OrderKind::GiftCard,
                price,
                json!({
                    "gift_card_id": card.id,
                    "card_type": card.card_type,
                    "seller_id": card.seller_id,
                }),
            )
            .await?;

        let balances = self.wallet.lock_account(&mut tx, buyer_id).await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            card_id = %card_id,
            buyer_id = %buyer_id,
            amount = price,
            "Gift card reserved, funds in escrow"
        );

        Ok(ReserveReceipt {
            order,
            item_status: CardStatus::Pending,
            balances,
        })
    }

    /// Seller confirms the sale: escrow moves to the seller, the card is
    /// marked sold (revealing the code to the buyer), the order completes.
    pub async fn confirm_settlement(
        &self,
        seller_id: Uuid,
        order_id: Uuid,
    ) -> Result<SettlementReceipt, EscrowError> {
        let mut tx = self.db_pool.begin().await?;

        let order = self.orders.get_for_update(&mut tx, order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::AlreadyFinalized(order_id).into());
        }

        let (card, buyer_id) = self.load_order_card(&mut tx, &order).await?;

        if card.seller_id != seller_id {
            return Err(EscrowError::Forbidden(
                "Only the seller can confirm this sale".to_string(),
            ));
        }

        self.wallet.lock_account(&mut tx, buyer_id).await?;
        self.wallet.lock_account(&mut tx, seller_id).await?;

        let card = self
            .catalog
            .settle(&mut tx, card.id, SettleOutcome::Sold)
            .await?;

        self.wallet
            .release_from_escrow(&mut tx, buyer_id, order.amount, seller_id)
            .await?;
        self.wallet
            .record(
                &mut tx,
                seller_id,
                order.amount,
                TransactionKind::Deposit,
                TransactionStatus::Completed,
                &format!("Gift card sale - {}", card.card_type),
            )
            .await?;

        let order = self
            .orders
            .finalize(&mut tx, order_id, OrderOutcome::Completed)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            card_id = %card.id,
            seller_id = %seller_id,
            amount = order.amount,
            "Settlement confirmed, escrow released to seller"
        );

        Ok(SettlementReceipt {
            order,
            item_status: CardStatus::Sold,
        })
    }

    /// Buyer or seller contests the purchase. The card freezes in
    /// `disputed`, the order stays pending, and the funds stay in escrow
    /// until an admin resolves it.
    pub async fn flag_dispute(
        &self,
        caller_id: Uuid,
        order_id: Uuid,
    ) -> Result<SettlementReceipt, EscrowError> {
        let mut tx = self.db_pool.begin().await?;

        let order = self.orders.get_for_update(&mut tx, order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::AlreadyFinalized(order_id).into());
        }

        let (card, buyer_id) = self.load_order_card(&mut tx, &order).await?;

        if caller_id != buyer_id && caller_id != card.seller_id {
            return Err(EscrowError::Forbidden(
                "Only the buyer or seller can dispute this purchase".to_string(),
            ));
        }

        self.catalog
            .settle(&mut tx, card.id, SettleOutcome::Disputed)
            .await?;

        tx.commit().await?;

        tracing::warn!(
            order_id = %order_id,
            card_id = %card.id,
            caller_id = %caller_id,
            "Purchase disputed, escrow frozen"
        );

        Ok(SettlementReceipt {
            order,
            item_status: CardStatus::Disputed,
        })
    }

    /// Admin resolution of a disputed purchase: release pays the seller,
    /// refund returns the escrow to the buyer and fails the order.
    pub async fn resolve_dispute(
        &self,
        order_id: Uuid,
        resolution: DisputeResolution,
    ) -> Result<SettlementReceipt, EscrowError> {
        let mut tx = self.db_pool.begin().await?;

        let order = self.orders.get_for_update(&mut tx, order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::AlreadyFinalized(order_id).into());
        }

        let (card, buyer_id) = self.load_order_card(&mut tx, &order).await?;

        if card.status != CardStatus::Disputed {
            return Err(CatalogError::InvalidTransition {
                id: card.id,
                from: card.status,
                to: CardStatus::Sold,
            }
            .into());
        }

        self.wallet.lock_account(&mut tx, buyer_id).await?;

        let (order, item_status) = match resolution {
            DisputeResolution::Release => {
                self.wallet.lock_account(&mut tx, card.seller_id).await?;

                self.catalog.settle_disputed(&mut tx, card.id).await?;
                self.wallet
                    .release_from_escrow(&mut tx, buyer_id, order.amount, card.seller_id)
                    .await?;
                self.wallet
                    .record(
                        &mut tx,
                        card.seller_id,
                        order.amount,
                        TransactionKind::Deposit,
                        TransactionStatus::Completed,
                        &format!("Gift card sale (dispute released) - {}", card.card_type),
                    )
                    .await?;

                let order = self
                    .orders
                    .finalize(&mut tx, order_id, OrderOutcome::Completed)
                    .await?;
                (order, CardStatus::Sold)
            }
            DisputeResolution::Refund => {
                // The card stays disputed as a tombstone; it never returns
                // to the marketplace.
                self.wallet
                    .release_from_escrow(&mut tx, buyer_id, order.amount, buyer_id)
                    .await?;
                self.wallet
                    .record(
                        &mut tx,
                        buyer_id,
                        order.amount,
                        TransactionKind::Deposit,
                        TransactionStatus::Completed,
                        &format!("Escrow refund (dispute) - {}", card.card_type),
                    )
                    .await?;

                let order = self
                    .orders
                    .finalize(&mut tx, order_id, OrderOutcome::Failed)
                    .await?;
                (order, CardStatus::Disputed)
            }
        };

        tx.commit().await?;

        tracing::info!(order_id = %order_id, card_id = %card.id, ?resolution, "Dispute resolved");

        Ok(SettlementReceipt { order, item_status })
    }

    /// Roll back reservations that have sat pending longer than
    /// `ttl_hours`: refund the buyer, return the card to the marketplace,
    /// fail the order. Returns the affected card ids.
    pub async fn expire_reservations(&self, ttl_hours: i64) -> Result<Vec<Uuid>, EscrowError> {
        let stale: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM gift_cards
            WHERE status = 'pending'
              AND reserved_at < NOW() - make_interval(hours => $1::int)
            "#,
        )
        .bind(ttl_hours as i32)
        .fetch_all(&self.db_pool)
        .await?;

        let mut expired = Vec::new();

        for (card_id,) in stale {
            match self.expire_one(card_id).await {
                Ok(true) => {
                    tracing::warn!(card_id = %card_id, "Reservation expired, escrow refunded");
                    expired.push(card_id);
                }
                Ok(false) => {} // settled or disputed since the scan
                Err(e) => {
                    tracing::error!(card_id = %card_id, error = %e, "Failed to expire reservation");
                }
            }
        }

        Ok(expired)
    }

    /// Expire a single reservation in its own transaction. Returns false
    /// when the card left `pending` between the scan and this call.
    async fn expire_one(&self, card_id: Uuid) -> Result<bool, EscrowError> {
        let mut tx = self.db_pool.begin().await?;

        let order = match self.orders.find_pending_for_card(&mut tx, card_id).await? {
            Some(order) => order,
            None => return Ok(false),
        };

        let (card, buyer_id) = self.load_order_card(&mut tx, &order).await?;
        if card.status != CardStatus::Pending {
            return Ok(false);
        }

        self.wallet.lock_account(&mut tx, buyer_id).await?;

        self.catalog.release_reservation(&mut tx, card_id).await?;
        self.wallet
            .release_from_escrow(&mut tx, buyer_id, order.amount, buyer_id)
            .await?;
        self.wallet
            .record(
                &mut tx,
                buyer_id,
                order.amount,
                TransactionKind::Deposit,
                TransactionStatus::Completed,
                &format!("Escrow refund (reservation expired) - {}", card.card_type),
            )
            .await?;
        self.orders
            .finalize(&mut tx, order.id, OrderOutcome::Failed)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    /// Resolve the card an order refers to, plus its buyer
    async fn load_order_card(
        &self,
        conn: &mut sqlx::PgConnection,
        order: &Order,
    ) -> Result<(GiftCard, Uuid), EscrowError> {
        let card_id = order
            .details
            .get("gift_card_id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| {
                EscrowError::InvalidOrder(format!("order {} is not a gift-card order", order.id))
            })?;

        let card: Option<GiftCard> = sqlx::query_as("SELECT * FROM gift_cards WHERE id = $1")
            .bind(card_id)
            .fetch_optional(&mut *conn)
            .await?;
        let card = card.ok_or(CatalogError::NotFound(card_id))?;

        let buyer_id = card.buyer_id.ok_or_else(|| {
            EscrowError::InvalidOrder(format!("card {} has no recorded buyer", card_id))
        })?;

        Ok((card, buyer_id))
    }
}
