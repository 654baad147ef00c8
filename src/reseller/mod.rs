//! Phone-number reseller domain module
//!
//! Thin client over the upstream activation marketplace, plus a
//! pass-through proxy so the API key never reaches the frontend.

mod client;
mod model;
mod service;

pub use client::{ResellerClient, ResellerError};
pub use model::*;
pub use service::{PhoneError, PhoneService};
