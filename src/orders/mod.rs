//! Order ledger domain module
//!
//! Durable record of purchase intents and their terminal outcome.

mod model;
mod service;

pub use model::*;
pub use service::{OrderError, OrderService};
