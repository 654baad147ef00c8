//! Wallet models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// A user's balances, in integer cents
#[derive(Debug, Serialize, sqlx::FromRow, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    pub available_balance: i64,
    pub escrow_balance: i64,
}

/// Wallet ledger entry. Append-only, never mutated.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry kind
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Purchase,
}

/// Ledger entry status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Request DTO for a wallet top-up
#[derive(Debug, Deserialize, Validate)]
pub struct DepositRequest {
    /// Amount in cents; minimum $5.00
    #[validate(range(min = 500, message = "minimum deposit is $5.00"))]
    pub amount: i64,
}

/// Query parameters for transaction history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}
