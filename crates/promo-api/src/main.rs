//! # Obereg Gate
//!
//! Promo-code backend for the «Обережье» app.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export DATABASE_URL=postgres://...
//! export CLOUDTIPS_SECRET=...
//! export YOOMONEY_SECRET=...
//! export TELEGRAM_BOT_TOKEN=...
//!
//! # Run the server
//! obereg-gate
//! ```

use promo_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state (connects the database, runs migrations)
    let state = AppState::from_env().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Telegram notifications: {}",
        if state.telegram.is_configured() {
            "enabled"
        } else {
            "disabled (no token)"
        }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Obereg Gate starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("CloudTips webhook: POST http://{}/api/payment-webhook", addr);
        info!("YooMoney webhook: POST http://{}/api/yoomoney-webhook", addr);
        info!("Validation: POST http://{}/api/validate-promo", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
