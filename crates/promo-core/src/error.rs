//! # Promo Error Types
//!
//! Typed error handling for the obereg-gate service.
//! All fallible operations return `Result<T, PromoError>`.

use thiserror::Error;

/// Core error type for promo-code operations
#[derive(Debug, Error)]
pub enum PromoError {
    /// Configuration errors (missing secrets, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook signature verification failed
    #[error("Signature mismatch for {provider}")]
    SignatureMismatch { provider: &'static str },

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Promo code does not exist
    #[error("Unknown promo code")]
    CodeNotFound,

    /// Promo code has already been redeemed
    #[error("Promo code already used")]
    CodeAlreadyUsed,

    /// Promo code belongs to a different service
    #[error("Promo code is for service '{actual}', not '{requested}'")]
    WrongService { requested: String, actual: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Network/HTTP error communicating with an external service
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PromoError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PromoError::Configuration(_) => 500,
            PromoError::InvalidRequest(_) => 400,
            PromoError::SignatureMismatch { .. } => 403,
            PromoError::WebhookParseError(_) => 400,
            PromoError::CodeNotFound => 404,
            PromoError::CodeAlreadyUsed => 400,
            PromoError::WrongService { .. } => 400,
            PromoError::Database(_) => 500,
            PromoError::NetworkError(_) => 503,
            PromoError::Internal(_) => 500,
        }
    }

    /// Returns true if the error is caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        let code = self.status_code();
        (400..500).contains(&code)
    }
}

/// Result type alias for promo operations
pub type PromoResult<T> = Result<T, PromoError>;
