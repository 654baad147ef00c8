//! SMM domain module
//!
//! Social-media-marketing service catalog, quoting, and order placement.

mod model;
mod service;

pub use model::*;
pub use service::{SmmError, SmmService};
