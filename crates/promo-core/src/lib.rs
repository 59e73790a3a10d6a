//! # promo-core
//!
//! Core types for the obereg-gate promo-code service.
//!
//! This crate provides:
//! - `AccessKind` and promo-code minting for the two paid features
//! - `PaymentGateway` trait for implementing payment providers
//! - `PaymentNotice` / `NoticeOutcome` for parsed webhook notifications
//! - `PromoError` for typed error handling
//! - Almanac lookup tables (chertog, zoroastrian totem, zodiac)
//!
//! ## Example
//!
//! ```rust,ignore
//! use promo_core::{AccessKind, mint_code, PaymentGateway, NoticeOutcome};
//!
//! // A webhook handler verifies the provider notification...
//! let outcome = gateway.verify_notification(&body, signature)?;
//!
//! // ...and mints a code for a confirmed payment
//! if let NoticeOutcome::Confirmed(notice) = outcome {
//!     let code = mint_code();
//!     store.issue(&code, notice.kind, notice.kind.use_limit(), notice.metadata).await?;
//! }
//! ```

pub mod almanac;
pub mod code;
pub mod error;
pub mod notice;

// Re-exports for convenience
pub use almanac::{Almanac, Chertog, ZodiacSign};
pub use code::{mint_code, normalize_code, AccessKind, CODE_ALPHABET};
pub use error::{PromoError, PromoResult};
pub use notice::{NoticeOutcome, PaymentGateway, PaymentNotice};
