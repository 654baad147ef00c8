//! Support domain module
//!
//! Tickets and their append-only reply threads.

mod model;
mod service;

pub use model::*;
pub use service::{SupportError, SupportService};
