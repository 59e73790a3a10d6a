//! # promo-store
//!
//! Postgres persistence for obereg-gate promo codes, over a shared
//! [`sqlx::PgPool`].
//!
//! One table, one lifecycle: a webhook handler inserts a row after a
//! confirmed payment; the validation endpoint flips `is_used` exactly once.
//! The flip is a conditional `UPDATE ... WHERE is_used = FALSE`, so two
//! concurrent redemptions of the same code resolve in the database and the
//! loser gets [`PromoError::CodeAlreadyUsed`].

pub mod model;
pub mod store;

pub use model::{PromoCodeRow, Redemption};
pub use store::PromoStore;
