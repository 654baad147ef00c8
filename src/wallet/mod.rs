//! Wallet domain module
//!
//! Account balances (available + escrow) and the append-only transaction
//! ledger. Every balance mutation appends a ledger row in the same database
//! transaction.

mod model;
mod service;

pub use model::*;
pub use service::{format_cents, WalletError, WalletService};
