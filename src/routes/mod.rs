//! Route definitions for SocialBlast API

mod auth;
mod escrow;
mod esim;
mod giftcard;
mod orders;
mod phone;
mod smm;
mod support;
mod user;
mod wallet;

pub use auth::auth_routes;
pub use escrow::escrow_routes;
pub use esim::esim_routes;
pub use giftcard::giftcard_routes;
pub use orders::order_routes;
pub use phone::phone_routes;
pub use smm::smm_routes;
pub use support::support_routes;
pub use user::user_routes;
pub use wallet::wallet_routes;
