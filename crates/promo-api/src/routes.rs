//! # Routes
//!
//! Axum router configuration. The paths mirror what the storefront and the
//! payment-provider dashboards are configured with, so they are flat under
//! `/api` rather than versioned.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health               - Health check
/// - POST /api/payment-webhook  - CloudTips webhook
/// - POST /api/yoomoney-webhook - YooMoney webhook
/// - POST /api/validate-promo   - Redeem a promo code
/// - GET  /api/almanac          - Almanac lookup
///
/// Wrong-method requests on any of these get the router's 405.
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/payment-webhook", post(handlers::cloudtips_webhook))
        .route("/yoomoney-webhook", post(handlers::yoomoney_webhook))
        .route("/validate-promo", post(handlers::validate_promo))
        .route("/almanac", get(handlers::almanac));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
