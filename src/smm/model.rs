//! SMM models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// A purchasable SMM offering (followers, likes, views, ..)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SmmOffering {
    pub id: Uuid,
    pub platform: String,
    pub service_type: String,
    pub name: String,
    pub description: String,
    pub min_quantity: i64,
    pub max_quantity: i64,
    /// Price per 1000 units, in cents
    pub price_per_1000: i64,
    pub average_time: String,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for browsing offerings
#[derive(Debug, Deserialize, Default)]
pub struct ListOfferingsQuery {
    pub platform: Option<String>,
    pub q: Option<String>,
}

/// Request DTO for placing an SMM order
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceSmmOrderRequest {
    pub service_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i64,
    /// Target profile or post URL
    #[validate(url)]
    pub link: String,
}

/// Price quote for a quantity of an offering
#[derive(Debug, Serialize)]
pub struct SmmQuote {
    pub service_id: Uuid,
    pub quantity: i64,
    pub cost: i64,
}

/// Cost of `quantity` units at `price_per_1000` cents, rounded up so a
/// partial thousand is never free.
pub fn quote_cost(price_per_1000: i64, quantity: i64) -> i64 {
    (price_per_1000 * quantity + 999) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_cost_exact_thousands() {
        assert_eq!(quote_cost(250, 1000), 250);
        assert_eq!(quote_cost(250, 2000), 500);
    }

    #[test]
    fn test_quote_cost_rounds_up() {
        // 250 cents per 1000 => 1 unit costs 0.25 cents, charged as 1
        assert_eq!(quote_cost(250, 1), 1);
        assert_eq!(quote_cost(250, 100), 25);
        assert_eq!(quote_cost(999, 500), 500);
    }

    #[test]
    fn test_quote_cost_zero_quantity() {
        assert_eq!(quote_cost(250, 0), 0);
    }
}
