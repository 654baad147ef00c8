//! Wallet service layer - balance arithmetic and the audit ledger
//!
//! The mutating primitives take a `&mut PgConnection` so the escrow
//! coordinator can compose them with catalog and order writes inside one
//! database transaction. Callers must lock the account row first
//! (`lock_account`) so concurrent mutations on the same user are linearized.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::wallet::{Balances, TransactionKind, TransactionStatus, WalletTransaction};

/// Wallet errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Escrow underflow: required {required}, held {held}")]
    EscrowUnderflow { required: i64, held: i64 },

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Wallet service. Single source of truth for user balances.
#[derive(Clone)]
pub struct WalletService {
    db_pool: PgPool,
}

impl WalletService {
    /// Create a new wallet service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Current balances for a user
    pub async fn balances(&self, user_id: Uuid) -> Result<Balances, WalletError> {
        sqlx::query_as::<_, Balances>(
            "SELECT available_balance, escrow_balance FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(WalletError::AccountNotFound(user_id))
    }

    /// Recent ledger entries for a user, newest first
    pub async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, WalletError> {
        let limit = limit.clamp(1, 100);

        let rows = sqlx::query_as::<_, WalletTransaction>(
            r#"
            SELECT * FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows)
    }

    /// Top up a user's available balance.
    ///
    /// Credit and ledger row commit together.
    pub async fn deposit(&self, user_id: Uuid, amount: i64) -> Result<Balances, WalletError> {
        let mut tx = self.db_pool.begin().await?;

        self.lock_account(&mut tx, user_id).await?;
        self.credit(&mut tx, user_id, amount).await?;
        self.record(
            &mut tx,
            user_id,
            amount,
            TransactionKind::Deposit,
            TransactionStatus::Completed,
            &format!("Wallet deposit of {}", format_cents(amount)),
        )
        .await?;

        let balances = sqlx::query_as::<_, Balances>(
            "SELECT available_balance, escrow_balance FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user_id, amount, "Deposit credited");

        Ok(balances)
    }

    // ===== Transaction-scoped primitives =====

    /// Lock the account row and return its balances.
    ///
    /// Must be the first touch of a user row inside any multi-step unit.
    pub async fn lock_account(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Balances, WalletError> {
        sqlx::query_as::<_, Balances>(
            "SELECT available_balance, escrow_balance FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(WalletError::AccountNotFound(user_id))
    }

    /// Decrement available balance; fails without mutating on shortfall.
    pub async fn debit(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: i64,
    ) -> Result<(), WalletError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET available_balance = available_balance - $1, updated_at = NOW()
            WHERE id = $2 AND available_balance >= $1
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            let balances = self.lock_account(conn, user_id).await?;
            return Err(WalletError::InsufficientFunds {
                required: amount,
                available: balances.available_balance,
            });
        }

        Ok(())
    }

    /// Increment available balance; no upper bound.
    pub async fn credit(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: i64,
    ) -> Result<(), WalletError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET available_balance = available_balance + $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(WalletError::AccountNotFound(user_id));
        }

        Ok(())
    }

    /// Move funds from available into escrow as one update.
    pub async fn move_to_escrow(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: i64,
    ) -> Result<(), WalletError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET available_balance = available_balance - $1,
                escrow_balance = escrow_balance + $1,
                updated_at = NOW()
            WHERE id = $2 AND available_balance >= $1
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            let balances = self.lock_account(conn, user_id).await?;
            return Err(WalletError::InsufficientFunds {
                required: amount,
                available: balances.available_balance,
            });
        }

        Ok(())
    }

    /// Release escrowed funds held by `from` into `to`'s available balance.
    ///
    /// `to == from` refunds the holder. An underflow here means escrow
    /// bookkeeping diverged from card state and must never reach callers.
    pub async fn release_from_escrow(
        &self,
        conn: &mut PgConnection,
        from: Uuid,
        amount: i64,
        to: Uuid,
    ) -> Result<(), WalletError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET escrow_balance = escrow_balance - $1, updated_at = NOW()
            WHERE id = $2 AND escrow_balance >= $1
            "#,
        )
        .bind(amount)
        .bind(from)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            let balances = self.lock_account(conn, from).await?;
            return Err(WalletError::EscrowUnderflow {
                required: amount,
                held: balances.escrow_balance,
            });
        }

        self.credit(conn, to, amount).await?;

        Ok(())
    }

    /// Append a ledger row. Called inside the same transaction as every
    /// balance change - no balance change without an audit entry.
    pub async fn record(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        amount: i64,
        kind: TransactionKind,
        status: TransactionStatus,
        description: &str,
    ) -> Result<WalletTransaction, WalletError> {
        let entry = sqlx::query_as::<_, WalletTransaction>(
            r#"
            INSERT INTO transactions (id, user_id, amount, kind, status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(amount)
        .bind(kind)
        .bind(status)
        .bind(description)
        .fetch_one(&mut *conn)
        .await?;

        Ok(entry)
    }
}

/// Render integer cents as a dollar string for ledger descriptions
pub fn format_cents(amount: i64) -> String {
    format!("${}.{:02}", amount / 100, (amount % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(4500), "$45.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(100), "$1.00");
        assert_eq!(format_cents(123456), "$1234.56");
    }
}
