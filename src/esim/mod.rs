//! eSIM domain module
//!
//! Plan catalog and the direct (non-escrowed) purchase flow.

mod model;
mod service;

pub use model::*;
pub use service::{EsimError, EsimService};
