//! Promo code row model

use chrono::{DateTime, Utc};
use promo_core::{AccessKind, PromoError, PromoResult};
use serde::Serialize;
use sqlx::FromRow;

/// A row of the `promocodes` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromoCodeRow {
    pub id: i64,
    /// Lower-cased code string
    pub code: String,
    /// `sketch` | `master_spread`
    pub kind: String,
    pub use_limit: Option<i32>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PromoCodeRow {
    /// Typed access kind, `None` if the column holds an unknown value
    pub fn access_kind(&self) -> Option<AccessKind> {
        AccessKind::parse(&self.kind)
    }

    /// Gate for redemption: the row must be unused and, when the caller
    /// named a service, match it. Checked in this order so an already-used
    /// code reports as used even if the service is also wrong, matching
    /// what the storefront shows the customer.
    pub fn check_redeemable(&self, requested: Option<&str>) -> PromoResult<()> {
        if self.is_used {
            return Err(PromoError::CodeAlreadyUsed);
        }

        if let Some(requested) = requested {
            if self.kind != requested {
                return Err(PromoError::WrongService {
                    requested: requested.to_string(),
                    actual: self.kind.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Outcome of a successful redemption, returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    /// The service the code unlocks
    #[serde(rename = "type")]
    pub kind: AccessKind,
    /// Usage limit carried by the code, `None` for unlimited
    #[serde(rename = "limit")]
    pub use_limit: Option<i32>,
}
