//! Escrow coordinator domain module
//!
//! Orchestrates gift-card purchases across the wallet, catalog, and order
//! ledger as single database transactions, and sweeps expired reservations.

mod model;
mod service;
mod sweeper;

pub use model::*;
pub use service::{EscrowError, EscrowService};
pub use sweeper::reservation_sweeper;
