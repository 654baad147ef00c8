//! Catalog service layer - gift-card listings and status transitions
//!
//! Status transitions use conditional updates (`WHERE status = ..`) so two
//! concurrent callers racing for the same card get exactly one winner; the
//! loser sees zero rows affected and a typed error.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{
    CardStatus, GiftCard, GiftCardListing, ListCardsQuery, SellCardRequest, SettleOutcome,
};

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Item is not available: {0}")]
    ItemNotAvailable(Uuid),

    #[error("Invalid transition: card {id} is {from}, cannot become {to}")]
    InvalidTransition {
        id: Uuid,
        from: CardStatus,
        to: CardStatus,
    },

    #[error("Gift card not found: {0}")]
    NotFound(Uuid),

    #[error("Code is only visible to the confirmed buyer after settlement")]
    CodeNotVisible,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Catalog service for the gift-card marketplace
#[derive(Clone)]
pub struct CatalogService {
    db_pool: PgPool,
}

impl CatalogService {
    /// Create a new catalog service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Browse available cards with filtering and pagination
    pub async fn list(&self, query: ListCardsQuery) -> Result<Vec<GiftCardListing>, CatalogError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            r#"
            SELECT g.id, g.seller_id, u.full_name AS seller_name, g.card_type,
                   g.face_value, g.asking_price, g.currency, g.status, g.created_at
            FROM gift_cards g
            JOIN users u ON u.id = g.seller_id
            WHERE g.status = 'available'
            "#,
        );

        if let Some(card_type) = query.card_type {
            query_builder.push(" AND g.card_type = ");
            query_builder.push_bind(card_type);
        }
        if let Some(q) = query.q {
            let pattern = format!("%{}%", q);
            query_builder.push(" AND (g.card_type ILIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(" OR u.full_name ILIKE ");
            query_builder.push_bind(pattern);
            query_builder.push(")");
        }

        query_builder.push(" ORDER BY g.created_at DESC LIMIT ");
        query_builder.push_bind(limit as i64);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset as i64);

        let listings = query_builder
            .build_query_as::<GiftCardListing>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(listings)
    }

    /// List a card for sale on behalf of a seller
    pub async fn create_listing(
        &self,
        seller_id: Uuid,
        request: SellCardRequest,
    ) -> Result<GiftCard, CatalogError> {
        let card = sqlx::query_as::<_, GiftCard>(
            r#"
            INSERT INTO gift_cards (
                id, seller_id, card_type, face_value, asking_price, currency, code, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(&request.card_type)
        .bind(request.face_value)
        .bind(request.asking_price)
        .bind(request.currency.to_uppercase())
        .bind(&request.code)
        .bind(CardStatus::Available)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(card_id = %card.id, seller_id = %seller_id, "Gift card listed");

        Ok(card)
    }

    /// Get a single card by ID
    pub async fn get(&self, card_id: Uuid) -> Result<GiftCard, CatalogError> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE id = $1")
            .bind(card_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(CatalogError::NotFound(card_id))
    }

    /// Cards a seller has listed, any status
    pub async fn listed_by(&self, seller_id: Uuid) -> Result<Vec<GiftCard>, CatalogError> {
        let cards = sqlx::query_as::<_, GiftCard>(
            "SELECT * FROM gift_cards WHERE seller_id = $1 ORDER BY created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(cards)
    }

    // ===== Transaction-scoped transitions =====

    /// Reserve an available card for a buyer (`available -> pending`).
    ///
    /// The conditional update is the arbiter under races: at most one
    /// reservation wins, every other caller gets `ItemNotAvailable`.
    pub async fn reserve(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<GiftCard, CatalogError> {
        let reserved = sqlx::query_as::<_, GiftCard>(
            r#"
            UPDATE gift_cards
            SET status = 'pending', buyer_id = $2, reserved_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(buyer_id)
        .fetch_optional(&mut *conn)
        .await?;

        match reserved {
            Some(card) => Ok(card),
            None => {
                // Lost the race, or the card never existed
                let exists: Option<(CardStatus,)> =
                    sqlx::query_as("SELECT status FROM gift_cards WHERE id = $1")
                        .bind(card_id)
                        .fetch_optional(&mut *conn)
                        .await?;

                match exists {
                    Some(_) => Err(CatalogError::ItemNotAvailable(card_id)),
                    None => Err(CatalogError::NotFound(card_id)),
                }
            }
        }
    }

    /// Settle a pending card as sold or disputed (`pending -> {sold, disputed}`)
    pub async fn settle(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
        outcome: SettleOutcome,
    ) -> Result<GiftCard, CatalogError> {
        self.transition(conn, card_id, CardStatus::Pending, outcome.status())
            .await
    }

    /// Admin dispute release (`disputed -> sold`)
    pub async fn settle_disputed(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
    ) -> Result<GiftCard, CatalogError> {
        self.transition(conn, card_id, CardStatus::Disputed, CardStatus::Sold)
            .await
    }

    /// Roll an expired reservation back (`pending -> available`), clearing
    /// the buyer.
    pub async fn release_reservation(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
    ) -> Result<GiftCard, CatalogError> {
        let card = sqlx::query_as::<_, GiftCard>(
            r#"
            UPDATE gift_cards
            SET status = 'available', buyer_id = NULL, reserved_at = NULL, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(card_id)
        .fetch_optional(&mut *conn)
        .await?;

        match card {
            Some(card) => Ok(card),
            None => Err(self.transition_failure(conn, card_id, CardStatus::Available).await?),
        }
    }

    /// Reveal the secret code: sold cards only, confirmed buyer only
    pub async fn reveal_code(&self, card_id: Uuid, buyer_id: Uuid) -> Result<String, CatalogError> {
        let card = self.get(card_id).await?;

        if card.status != CardStatus::Sold || card.buyer_id != Some(buyer_id) {
            return Err(CatalogError::CodeNotVisible);
        }

        Ok(card.code)
    }

    async fn transition(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
        expected: CardStatus,
        next: CardStatus,
    ) -> Result<GiftCard, CatalogError> {
        let card = sqlx::query_as::<_, GiftCard>(
            r#"
            UPDATE gift_cards
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&mut *conn)
        .await?;

        match card {
            Some(card) => Ok(card),
            None => Err(self.transition_failure(conn, card_id, next).await?),
        }
    }

    /// Build the error for a transition whose conditional update matched
    /// nothing: the card is gone, or sits in a different state.
    async fn transition_failure(
        &self,
        conn: &mut PgConnection,
        card_id: Uuid,
        to: CardStatus,
    ) -> Result<CatalogError, CatalogError> {
        let current: Option<(CardStatus,)> =
            sqlx::query_as("SELECT status FROM gift_cards WHERE id = $1")
                .bind(card_id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(match current {
            Some((from,)) => CatalogError::InvalidTransition {
                id: card_id,
                from,
                to,
            },
            None => CatalogError::NotFound(card_id),
        })
    }
}
