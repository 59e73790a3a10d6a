//! # YooMoney Gateway
//!
//! YooMoney HTTP notifications arrive form-encoded with the signature in
//! the body itself: `sha1_hash` is the hex SHA-1 of an ampersand-joined
//! string of selected fields with the notification secret spliced in.
//!
//! Two kinds of transfer are acknowledged but never fulfilled: payments
//! protected with a protection code (`codepro=true`) and unbilled transfers,
//! since neither has actually settled. The customer's Telegram chat id
//! travels in the `label` field; the sentinel label `manual_user` marks
//! payments taken over chat where the operator delivers the code by hand.

use crate::config::YooMoneyConfig;
use chrono::Utc;
use promo_core::{AccessKind, NoticeOutcome, PaymentGateway, PaymentNotice, PromoError, PromoResult};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

/// Transfers at or above this many rubles buy the sketch generator. Set
/// below the CloudTips threshold to leave headroom for the wallet fee on a
/// 500 ruble payment.
pub const SKETCH_THRESHOLD_RUB: f64 = 450.0;

/// Label marking a payment whose code is delivered manually by the operator
pub const MANUAL_LABEL: &str = "manual_user";

/// Raw YooMoney notification payload (form-encoded)
#[derive(Debug, Default, Deserialize)]
pub struct YooMoneyNotification {
    #[serde(default)]
    pub notification_type: String,
    #[serde(default)]
    pub operation_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub withdraw_amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub codepro: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sha1_hash: String,
    #[serde(default)]
    pub unbilled: String,
}

impl YooMoneyNotification {
    /// Signature source string, per the YooMoney HTTP-notification spec:
    /// `notification_type&operation_id&amount&currency&datetime&sender&codepro&secret&label`
    fn signature_source(&self, secret: &str) -> String {
        [
            self.notification_type.as_str(),
            self.operation_id.as_str(),
            self.amount.as_str(),
            self.currency.as_str(),
            self.datetime.as_str(),
            self.sender.as_str(),
            self.codepro.as_str(),
            secret,
            self.label.as_str(),
        ]
        .join("&")
    }

    /// Effective amount: `withdraw_amount` is what reached the wallet,
    /// `amount` (what the sender was charged) is the fallback.
    fn effective_amount(&self) -> Option<f64> {
        self.withdraw_amount
            .parse::<f64>()
            .or_else(|_| self.amount.parse::<f64>())
            .ok()
    }
}

/// YooMoney payment gateway
pub struct YooMoneyGateway {
    config: YooMoneyConfig,
}

impl YooMoneyGateway {
    pub fn new(config: YooMoneyConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(YooMoneyConfig::from_env())
    }
}

impl PaymentGateway for YooMoneyGateway {
    fn verify_notification(
        &self,
        payload: &[u8],
        _signature: Option<&str>,
    ) -> PromoResult<NoticeOutcome> {
        let secret = self.config.secret.as_deref().ok_or_else(|| {
            PromoError::Configuration("YOOMONEY_SECRET is not set".to_string())
        })?;

        let notification: YooMoneyNotification = serde_urlencoded::from_bytes(payload)
            .map_err(|e| PromoError::WebhookParseError(format!("YooMoney form body: {}", e)))?;

        let computed = hex::encode(Sha1::digest(notification.signature_source(secret)));
        if !computed.eq_ignore_ascii_case(&notification.sha1_hash) {
            warn!(
                operation_id = %notification.operation_id,
                "YooMoney signature mismatch"
            );
            return Err(PromoError::SignatureMismatch {
                provider: "yoomoney",
            });
        }

        if notification.codepro == "true" || notification.unbilled == "true" {
            debug!("ignoring protected or unbilled YooMoney transfer");
            return Ok(NoticeOutcome::Ignored("protected or unbilled transfer"));
        }

        if notification.label.is_empty() {
            debug!("YooMoney payment without label, nowhere to deliver the code");
            return Ok(NoticeOutcome::Ignored("no label"));
        }

        let amount = notification.effective_amount().ok_or_else(|| {
            PromoError::WebhookParseError("unparseable YooMoney amount".to_string())
        })?;

        let kind = if amount >= SKETCH_THRESHOLD_RUB {
            AccessKind::Sketch
        } else {
            AccessKind::MasterSpread
        };

        let metadata = serde_json::json!({
            "source": "yoomoney",
            "operation_id": notification.operation_id,
            "amount": amount,
            "invoiceId": notification.label,
            "processed_at": Utc::now().to_rfc3339(),
        });

        let chat_id = if notification.label == MANUAL_LABEL {
            None
        } else {
            Some(notification.label.clone())
        };

        Ok(NoticeOutcome::Confirmed(PaymentNotice {
            provider: "yoomoney",
            kind,
            amount,
            chat_id,
            payer_email: None,
            metadata,
        }))
    }

    fn provider_name(&self) -> &'static str {
        "yoomoney"
    }
}
