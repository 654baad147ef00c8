//! Escrow coordinator DTOs

use serde::{Deserialize, Serialize};

use crate::catalog::CardStatus;
use crate::orders::Order;
use crate::wallet::Balances;

/// Result of a successful reserve-and-pay call
#[derive(Debug, Serialize)]
pub struct ReserveReceipt {
    pub order: Order,
    pub item_status: CardStatus,
    pub balances: Balances,
}

/// Result of a settlement or dispute decision
#[derive(Debug, Serialize)]
pub struct SettlementReceipt {
    pub order: Order,
    pub item_status: CardStatus,
}

/// Admin decision on a disputed purchase
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisputeResolution {
    /// Pay the seller and reveal the code to the buyer
    Release,
    /// Return the escrowed funds to the buyer
    Refund,
}

/// Request body for resolving a dispute
#[derive(Debug, Deserialize)]
pub struct ResolveDisputeRequest {
    pub resolution: DisputeResolution,
}
