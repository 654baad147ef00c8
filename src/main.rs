//! SocialBlast Backend Server
//!
//! Rust backend for the SocialBlast marketplace: wallet and escrow
//! lifecycle, gift-card trading, eSIM plans, SMM orders, and the
//! phone-number reseller proxy.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use socialblast_server::auth::AuthService;
use socialblast_server::catalog::CatalogService;
use socialblast_server::config::Config;
use socialblast_server::escrow::{reservation_sweeper, EscrowService};
use socialblast_server::esim::EsimService;
use socialblast_server::orders::OrderService;
use socialblast_server::reseller::{PhoneService, ResellerClient};
use socialblast_server::smm::SmmService;
use socialblast_server::support::SupportService;
use socialblast_server::wallet::WalletService;
use socialblast_server::{db, middleware, routes, state::AppState};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    // Initialize database connection pool and schema
    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    // Initialize services
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
    ));

    let wallet_service = WalletService::new(db_pool.clone());
    let catalog_service = CatalogService::new(db_pool.clone());
    let order_service = OrderService::new(db_pool.clone());

    let escrow_service = Arc::new(EscrowService::new(
        db_pool.clone(),
        wallet_service.clone(),
        catalog_service.clone(),
        order_service.clone(),
    ));

    let esim_service = Arc::new(EsimService::new(
        db_pool.clone(),
        wallet_service.clone(),
        order_service.clone(),
    ));

    let smm_service = Arc::new(SmmService::new(
        db_pool.clone(),
        wallet_service.clone(),
        order_service.clone(),
    ));

    let reseller_client = ResellerClient::new(
        config.reseller_base_url.clone(),
        config.reseller_api_key.clone(),
    );
    let phone_service = Arc::new(PhoneService::new(
        db_pool.clone(),
        reseller_client,
        order_service.clone(),
    ));

    let support_service = Arc::new(SupportService::new(db_pool.clone()));

    // Create shared app state
    let app_state = AppState {
        auth_service,
        wallet_service: Arc::new(wallet_service),
        catalog_service: Arc::new(catalog_service),
        order_service: Arc::new(order_service),
        escrow_service: escrow_service.clone(),
        esim_service,
        smm_service,
        phone_service,
        support_service,
    };

    // Start reservation sweeper in background
    let sweeper_service = escrow_service.clone();
    let sweep_interval = config.sweep_interval_secs;
    let reservation_ttl = config.reservation_ttl_hours;
    tokio::spawn(async move {
        reservation_sweeper(sweeper_service, sweep_interval, reservation_ttl).await;
        tracing::error!("Reservation sweeper exited unexpectedly");
    });

    // Clone db_pool for health check
    let health_db_pool = db_pool.clone();

    // Initialize rate limiter
    let rate_limiter = middleware::RateLimiter::new(config.rate_limit_rps);

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_db_pool.clone())))
        .merge(routes::auth_routes())
        .merge(routes::user_routes())
        .merge(routes::wallet_routes())
        .merge(routes::giftcard_routes())
        .merge(routes::escrow_routes())
        .merge(routes::order_routes())
        .merge(routes::esim_routes())
        .merge(routes::smm_routes())
        .merge(routes::phone_routes())
        .merge(routes::support_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(axum::middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            middleware::rate_limit_layer(limiter)(req, next)
        }))
        .layer(configure_cors());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "SocialBlast API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let db_status = match db::check_health(&pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors() -> CorsLayer {
    let allowed_origins_str = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    if allowed_origins_str.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
