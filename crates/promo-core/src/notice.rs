//! # Payment Gateway Trait
//!
//! Each payment provider (CloudTips, YooMoney) implements [`PaymentGateway`]:
//! verify the provider signature over the raw request body, then either hand
//! back a confirmed [`PaymentNotice`] or tell the caller to ignore the
//! notification with a 200. Providers that are not payments (protection-code
//! holds, unbilled transfers, test pings) must be acknowledged, not errored,
//! or the provider keeps retrying.

use crate::code::AccessKind;
use crate::error::PromoResult;

/// A verified, confirmed payment notification
#[derive(Debug, Clone)]
pub struct PaymentNotice {
    /// Provider name (for logging and metadata)
    pub provider: &'static str,

    /// Which paid feature the payment maps to
    pub kind: AccessKind,

    /// Amount in rubles as reported by the provider
    pub amount: f64,

    /// Telegram chat id to deliver the code to, when the payment carried one
    pub chat_id: Option<String>,

    /// Payer email, when the provider reports one
    pub payer_email: Option<String>,

    /// Provider-specific details persisted alongside the code
    pub metadata: serde_json::Value,
}

/// Result of verifying a webhook notification
#[derive(Debug, Clone)]
pub enum NoticeOutcome {
    /// Signature valid and payment confirmed: mint a code
    Confirmed(PaymentNotice),

    /// Signature valid but nothing to fulfil (non-success status, protected
    /// payment, missing recipient). Acknowledge with 200 and move on.
    Ignored(&'static str),
}

/// Trait implemented by each payment provider integration
pub trait PaymentGateway: Send + Sync {
    /// Verify the notification signature and parse the payload.
    ///
    /// # Arguments
    /// * `payload` - Raw request body bytes, exactly as received
    /// * `signature` - Signature header value, for providers that sign via
    ///   header (CloudTips). Providers that embed the signature in the body
    ///   (YooMoney) ignore this.
    fn verify_notification(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> PromoResult<NoticeOutcome>;

    /// Provider name (for logging and routing)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_outcome_variants() {
        let notice = PaymentNotice {
            provider: "cloudtips",
            kind: AccessKind::Sketch,
            amount: 500.0,
            chat_id: Some("12345".into()),
            payer_email: None,
            metadata: serde_json::json!({}),
        };

        match NoticeOutcome::Confirmed(notice) {
            NoticeOutcome::Confirmed(n) => assert_eq!(n.kind, AccessKind::Sketch),
            NoticeOutcome::Ignored(_) => panic!("expected confirmed"),
        }
    }
}
