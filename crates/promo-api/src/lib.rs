//! # promo-api
//!
//! HTTP API layer for obereg-gate.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Webhook endpoints for the payment providers
//! - The promo-code validation endpoint the storefront calls
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/payment-webhook` | CloudTips webhook |
//! | POST | `/api/yoomoney-webhook` | YooMoney webhook |
//! | POST | `/api/validate-promo` | Redeem a promo code |
//! | GET | `/api/almanac` | Date-based almanac lookup |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
