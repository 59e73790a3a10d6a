//! # Gateway Configuration
//!
//! Secrets for webhook signature verification, loaded from environment
//! variables. Both secrets are optional at startup: CloudTips verification
//! is skipped entirely when `CLOUDTIPS_SECRET` is unset (useful for local
//! testing against the provider sandbox), while a missing YooMoney secret
//! fails each request with a configuration error because YooMoney payloads
//! cannot be trusted without it.

use std::env;

/// CloudTips webhook configuration
#[derive(Debug, Clone, Default)]
pub struct CloudTipsConfig {
    /// HMAC secret for the `X-Content-HMAC` header. `None` disables
    /// verification.
    pub secret: Option<String>,
}

impl CloudTipsConfig {
    /// Load from `CLOUDTIPS_SECRET`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            secret: env::var("CLOUDTIPS_SECRET").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Create config with an explicit secret (for testing)
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    /// Config with verification disabled
    pub fn unverified() -> Self {
        Self { secret: None }
    }
}

/// YooMoney webhook configuration
#[derive(Debug, Clone, Default)]
pub struct YooMoneyConfig {
    /// Notification secret from the YooMoney HTTP-notifications settings
    pub secret: Option<String>,
}

impl YooMoneyConfig {
    /// Load from `YOOMONEY_SECRET`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            secret: env::var("YOOMONEY_SECRET").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Create config with an explicit secret (for testing)
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_secrets() {
        let ct = CloudTipsConfig::new("topsecret");
        assert_eq!(ct.secret.as_deref(), Some("topsecret"));

        let ym = YooMoneyConfig::new("notify-secret");
        assert_eq!(ym.secret.as_deref(), Some("notify-secret"));
    }

    #[test]
    fn test_unverified_cloudtips() {
        let ct = CloudTipsConfig::unverified();
        assert!(ct.secret.is_none());
    }
}
