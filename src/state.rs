//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::catalog::CatalogService;
use crate::escrow::EscrowService;
use crate::esim::EsimService;
use crate::orders::OrderService;
use crate::reseller::PhoneService;
use crate::smm::SmmService;
use crate::support::SupportService;
use crate::wallet::WalletService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub wallet_service: Arc<WalletService>,
    pub catalog_service: Arc<CatalogService>,
    pub order_service: Arc<OrderService>,
    pub escrow_service: Arc<EscrowService>,
    pub esim_service: Arc<EsimService>,
    pub smm_service: Arc<SmmService>,
    pub phone_service: Arc<PhoneService>,
    pub support_service: Arc<SupportService>,
}

// The auth extractor pulls the auth service out of any state it runs under
impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
