//! Gift-card models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Gift card row. The `code` is the sellable secret: it never serializes
/// into API responses; `CatalogService::reveal_code` is the only way out.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct GiftCard {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Option<Uuid>,
    pub card_type: String,
    pub face_value: i64,
    pub asking_price: i64,
    pub currency: String,
    #[serde(skip_serializing)]
    pub code: String,
    pub status: CardStatus,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Marketplace listing row - a gift card joined with its seller's display
/// name, without the code column.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct GiftCardListing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: Option<String>,
    pub card_type: String,
    pub face_value: i64,
    pub asking_price: i64,
    pub currency: String,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
}

/// Gift card lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "card_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Available,
    Pending,
    Sold,
    Disputed,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Available => "available",
            CardStatus::Pending => "pending",
            CardStatus::Sold => "sold",
            CardStatus::Disputed => "disputed",
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// available -> pending -> {sold, disputed}; a disputed card can still
    /// be sold by admin resolution, and an expired reservation returns to
    /// available. Sold is terminal.
    pub fn can_transition_to(self, next: CardStatus) -> bool {
        use CardStatus::*;
        matches!(
            (self, next),
            (Available, Pending)
                | (Pending, Sold)
                | (Pending, Disputed)
                | (Pending, Available)
                | (Disputed, Sold)
        )
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement outcome for a pending card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Sold,
    Disputed,
}

impl SettleOutcome {
    pub fn status(self) -> CardStatus {
        match self {
            SettleOutcome::Sold => CardStatus::Sold,
            SettleOutcome::Disputed => CardStatus::Disputed,
        }
    }
}

/// Request DTO for listing a card for sale
#[derive(Debug, Deserialize, Validate)]
pub struct SellCardRequest {
    #[validate(length(min = 1, max = 64))]
    pub card_type: String,
    /// Face value in cents
    #[validate(range(min = 1))]
    pub face_value: i64,
    /// Asking price in cents. Pricing below face value is a marketplace
    /// convention, not a rule.
    #[validate(range(min = 1))]
    pub asking_price: i64,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 512))]
    pub code: String,
}

/// Query parameters for browsing the marketplace
#[derive(Debug, Deserialize, Default)]
pub struct ListCardsQuery {
    pub card_type: Option<String>,
    /// Free-text match against card type and seller name
    pub q: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Response carrying a revealed gift-card code
#[derive(Debug, Serialize)]
pub struct RevealCodeResponse {
    pub card_id: Uuid,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        use CardStatus::*;

        assert!(Available.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Sold));
        assert!(Pending.can_transition_to(Disputed));

        // expiry rollback
        assert!(Pending.can_transition_to(Available));

        // admin dispute release
        assert!(Disputed.can_transition_to(Sold));

        // sold is terminal
        assert!(!Sold.can_transition_to(Pending));
        assert!(!Sold.can_transition_to(Available));
        assert!(!Sold.can_transition_to(Disputed));

        // no shortcuts
        assert!(!Available.can_transition_to(Sold));
        assert!(!Available.can_transition_to(Disputed));
        assert!(!Disputed.can_transition_to(Available));
    }

    #[test]
    fn test_settle_outcome_status() {
        assert_eq!(SettleOutcome::Sold.status(), CardStatus::Sold);
        assert_eq!(SettleOutcome::Disputed.status(), CardStatus::Disputed);
    }
}
