//! # promo-gateways
//!
//! Payment gateway integrations for obereg-gate.
//!
//! Two providers are supported:
//!
//! 1. **CloudTipsGateway** - tip-jar payments
//!    - JSON body, HMAC-SHA256 signature in the `X-Content-HMAC` header
//!    - `invoiceId` carries the customer's Telegram chat id
//!
//! 2. **YooMoneyGateway** - YooMoney wallet transfers
//!    - Form-encoded body, SHA-1 signature embedded in the `sha1_hash` field
//!    - `label` carries the customer's Telegram chat id
//!
//! Both implement [`promo_core::PaymentGateway`]: verify the signature over
//! the raw body, branch on payment status, and hand back either a confirmed
//! [`promo_core::PaymentNotice`] or an ignore instruction.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use promo_gateways::CloudTipsGateway;
//! use promo_core::{PaymentGateway, NoticeOutcome};
//!
//! let gateway = CloudTipsGateway::from_env();
//!
//! match gateway.verify_notification(&body, signature)? {
//!     NoticeOutcome::Confirmed(notice) => { /* mint + persist + notify */ }
//!     NoticeOutcome::Ignored(reason) => { /* 200, nothing to do */ }
//! }
//! ```

pub mod cloudtips;
pub mod config;
pub mod yoomoney;

// Re-exports
pub use cloudtips::CloudTipsGateway;
pub use config::{CloudTipsConfig, YooMoneyConfig};
pub use yoomoney::YooMoneyGateway;
