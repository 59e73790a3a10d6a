//! # CloudTips Gateway
//!
//! CloudTips posts a JSON notification for every tip and signs the raw body
//! with HMAC-SHA256, base64-encoded in the `X-Content-HMAC` header. The
//! payment status for a settled tip is the literal string `Success`; every
//! other status is acknowledged and dropped.
//!
//! The storefront passes the customer's Telegram chat id through the
//! `invoiceId` field when building the tip link, which is how the minted
//! code finds its way back to the buyer.

use crate::config::CloudTipsConfig;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use promo_core::{AccessKind, NoticeOutcome, PaymentGateway, PaymentNotice, PromoError, PromoResult};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Tips at or above this many rubles buy the sketch generator; anything
/// below buys the master spread.
pub const SKETCH_THRESHOLD_RUB: f64 = 500.0;

/// Raw CloudTips notification payload
#[derive(Debug, Deserialize)]
pub struct CloudTipsNotification {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "payerEmail", default)]
    pub payer_email: Option<String>,
    #[serde(rename = "invoiceId", default)]
    pub invoice_id: Option<String>,
    #[serde(rename = "transactionId", default)]
    pub transaction_id: Option<serde_json::Value>,
}

/// CloudTips payment gateway
pub struct CloudTipsGateway {
    config: CloudTipsConfig,
}

impl CloudTipsGateway {
    pub fn new(config: CloudTipsConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(CloudTipsConfig::from_env())
    }

    /// Check the `X-Content-HMAC` header against HMAC-SHA256 over the raw
    /// body. Skipped entirely when no secret is configured.
    fn check_signature(&self, payload: &[u8], signature: Option<&str>) -> PromoResult<()> {
        let Some(secret) = &self.config.secret else {
            debug!("CLOUDTIPS_SECRET not set, skipping signature verification");
            return Ok(());
        };

        let provided = signature.ok_or(PromoError::SignatureMismatch {
            provider: "cloudtips",
        })?;

        let expected = BASE64.decode(provided).map_err(|_| {
            warn!("X-Content-HMAC is not valid base64");
            PromoError::SignatureMismatch {
                provider: "cloudtips",
            }
        })?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| PromoError::Internal(format!("HMAC init failed: {}", e)))?;
        mac.update(payload);
        mac.verify_slice(&expected)
            .map_err(|_| PromoError::SignatureMismatch {
                provider: "cloudtips",
            })
    }
}

impl PaymentGateway for CloudTipsGateway {
    fn verify_notification(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> PromoResult<NoticeOutcome> {
        self.check_signature(payload, signature)?;

        let notification: CloudTipsNotification = serde_json::from_slice(payload)
            .map_err(|e| PromoError::WebhookParseError(format!("CloudTips body: {}", e)))?;

        if notification.status != "Success" {
            debug!(status = %notification.status, "ignoring non-success CloudTips notification");
            return Ok(NoticeOutcome::Ignored("non-success status"));
        }

        let kind = if notification.amount >= SKETCH_THRESHOLD_RUB {
            AccessKind::Sketch
        } else {
            AccessKind::MasterSpread
        };

        let metadata = serde_json::json!({
            "transactionId": notification.transaction_id,
            "payerEmail": notification.payer_email,
            "invoiceId": notification.invoice_id,
        });

        Ok(NoticeOutcome::Confirmed(PaymentNotice {
            provider: "cloudtips",
            kind,
            amount: notification.amount,
            chat_id: notification.invoice_id.clone(),
            payer_email: notification.payer_email.clone(),
            metadata,
        }))
    }

    fn provider_name(&self) -> &'static str {
        "cloudtips"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn success_body(amount: f64) -> Vec<u8> {
        serde_json::json!({
            "status": "Success",
            "amount": amount,
            "payerEmail": "buyer@example.com",
            "invoiceId": "987654321",
            "transactionId": 42
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_valid_signature_confirms() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::new("s3cret"));
        let body = success_body(500.0);
        let sig = sign("s3cret", &body);

        let outcome = gateway.verify_notification(&body, Some(&sig)).unwrap();
        match outcome {
            NoticeOutcome::Confirmed(notice) => {
                assert_eq!(notice.kind, AccessKind::Sketch);
                assert_eq!(notice.chat_id.as_deref(), Some("987654321"));
                assert_eq!(notice.payer_email.as_deref(), Some("buyer@example.com"));
            }
            NoticeOutcome::Ignored(_) => panic!("expected confirmed"),
        }
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::new("s3cret"));
        let body = success_body(500.0);
        let sig = sign("different-secret", &body);

        let err = gateway.verify_notification(&body, Some(&sig)).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_missing_signature_rejected() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::new("s3cret"));
        let body = success_body(500.0);

        let err = gateway.verify_notification(&body, None).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_no_secret_skips_verification() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::unverified());
        let body = success_body(100.0);

        let outcome = gateway.verify_notification(&body, None).unwrap();
        assert!(matches!(outcome, NoticeOutcome::Confirmed(_)));
    }

    #[test]
    fn test_non_success_status_ignored() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::unverified());
        let body = serde_json::json!({"status": "Declined", "amount": 500.0})
            .to_string()
            .into_bytes();

        let outcome = gateway.verify_notification(&body, None).unwrap();
        assert!(matches!(outcome, NoticeOutcome::Ignored(_)));
    }

    #[test]
    fn test_amount_threshold() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::unverified());

        let outcome = gateway.verify_notification(&success_body(499.0), None).unwrap();
        match outcome {
            NoticeOutcome::Confirmed(n) => assert_eq!(n.kind, AccessKind::MasterSpread),
            _ => panic!("expected confirmed"),
        }

        let outcome = gateway.verify_notification(&success_body(750.0), None).unwrap();
        match outcome {
            NoticeOutcome::Confirmed(n) => assert_eq!(n.kind, AccessKind::Sketch),
            _ => panic!("expected confirmed"),
        }
    }

    #[test]
    fn test_garbage_body_rejected() {
        let gateway = CloudTipsGateway::new(CloudTipsConfig::unverified());
        let err = gateway.verify_notification(b"not json", None).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
