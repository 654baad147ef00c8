//! API handlers for SocialBlast backend

pub mod auth;
pub mod escrow;
pub mod esim;
pub mod giftcard;
pub mod orders;
pub mod phone;
pub mod smm;
pub mod support;
pub mod user;
pub mod wallet;

pub use auth::*;
pub use escrow::*;
pub use esim::*;
pub use giftcard::*;
pub use orders::*;
pub use phone::*;
pub use smm::*;
pub use support::*;
pub use user::*;
pub use wallet::*;

// Re-export extractors from middleware for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser};
