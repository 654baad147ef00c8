//! Background job that rolls back expired gift-card reservations

use std::sync::Arc;
use std::time::Duration;

use super::EscrowService;

/// Periodically expire reservations older than `ttl_hours`.
///
/// Spawned from `main`; runs for the lifetime of the process.
pub async fn reservation_sweeper(
    escrow_service: Arc<EscrowService>,
    interval_secs: u64,
    ttl_hours: i64,
) {
    tracing::info!(interval_secs, ttl_hours, "Starting reservation sweeper");

    loop {
        tokio::time::sleep(Duration::from_secs(interval_secs)).await;

        match escrow_service.expire_reservations(ttl_hours).await {
            Ok(expired) => {
                if !expired.is_empty() {
                    tracing::info!(count = expired.len(), "Expired stale reservations");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error expiring reservations");
            }
        }
    }
}
