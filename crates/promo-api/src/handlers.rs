//! # Request Handlers
//!
//! Axum request handlers for the promo-code service.
//!
//! The two webhook handlers share the same shape: verify the provider
//! signature over the raw body, branch on the notification outcome, and for
//! a confirmed payment mint a code, persist it, and fire the best-effort
//! notifications. Notification failures never affect the HTTP response the
//! provider sees.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use promo_core::{Almanac, NoticeOutcome, PaymentGateway, PaymentNotice, PromoError};
use promo_notify::payment_confirmed_message;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Validate-promo request body
#[derive(Debug, Deserialize)]
pub struct ValidatePromoRequest {
    /// The code the customer typed
    #[serde(default)]
    pub code: Option<String>,
    /// Expected service, when the UI knows which feature it is unlocking
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Almanac query parameters
#[derive(Debug, Deserialize)]
pub struct AlmanacQuery {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Map a domain error onto the webhook response contract: 403 for bad
/// signatures, 400 for malformed payloads, 500 for everything else.
fn webhook_error(err: PromoError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match &err {
        PromoError::SignatureMismatch { .. } => "Invalid signature".to_string(),
        PromoError::Configuration(_) => "Configuration error".to_string(),
        e if e.is_client_error() => err.to_string(),
        _ => "Internal server error".to_string(),
    };
    if status.is_server_error() {
        error!("webhook processing error: {}", err);
    } else {
        warn!("webhook rejected: {}", err);
    }
    (status, Json(ErrorResponse::new(message)))
}

/// Map a domain error onto the storefront contract. The messages are the
/// Russian strings the UI shows verbatim.
fn validate_error(err: PromoError) -> HandlerError {
    let (status, message) = match &err {
        PromoError::CodeNotFound => (StatusCode::NOT_FOUND, "Неверный код доступа"),
        PromoError::CodeAlreadyUsed => (StatusCode::BAD_REQUEST, "Этот код уже был использован"),
        PromoError::WrongService { .. } => (
            StatusCode::BAD_REQUEST,
            "Этот код предназначен для другой услуги",
        ),
        PromoError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Код не указан"),
        _ => {
            error!("validation error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Внутренняя ошибка сервера",
            )
        }
    };
    (status, Json(ErrorResponse::new(message)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "obereg-gate",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handle a CloudTips webhook.
/// The HMAC-SHA256 signature travels in the `X-Content-HMAC` header.
#[instrument(skip(state, headers, body))]
pub async fn cloudtips_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let signature = headers
        .get("x-content-hmac")
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .cloudtips
        .verify_notification(&body, signature)
        .map_err(webhook_error)?;

    match outcome {
        NoticeOutcome::Ignored(reason) => {
            info!(reason, "CloudTips notification ignored");
            Ok(Json(serde_json::json!({ "status": "ignored" })))
        }
        NoticeOutcome::Confirmed(notice) => {
            fulfil(&state, notice).await.map_err(webhook_error)?;
            Ok(Json(serde_json::json!({ "status": "Success" })))
        }
    }
}

/// Handle a YooMoney webhook.
/// Form-encoded body; the SHA-1 signature is the `sha1_hash` field.
/// YooMoney expects a bare `OK` for a fulfilled notification.
#[instrument(skip(state, body))]
pub async fn yoomoney_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, HandlerError> {
    let outcome = state
        .yoomoney
        .verify_notification(&body, None)
        .map_err(webhook_error)?;

    match outcome {
        NoticeOutcome::Ignored(reason) => {
            info!(reason, "YooMoney notification ignored");
            Ok(Json(serde_json::json!({ "status": "ignored" })).into_response())
        }
        NoticeOutcome::Confirmed(notice) => {
            fulfil(&state, notice).await.map_err(webhook_error)?;
            Ok("OK".into_response())
        }
    }
}

/// Mint and persist a code for a confirmed payment, then notify the
/// customer. Notifications are best-effort: a failed send is logged and
/// swallowed so the provider still gets its 200 and does not retry a
/// payment that has already been fulfilled.
async fn fulfil(state: &AppState, notice: PaymentNotice) -> Result<String, PromoError> {
    let code = state
        .store
        .issue_fresh(notice.kind, notice.metadata.clone())
        .await?;

    info!(
        provider = notice.provider,
        kind = %notice.kind,
        amount = notice.amount,
        "payment confirmed, code issued"
    );

    let text = payment_confirmed_message(notice.kind, &code, notice.provider);

    if let Some(chat_id) = &notice.chat_id {
        if let Err(e) = state.telegram.send_message(chat_id, &text).await {
            error!("Telegram notification failed: {}", e);
        }
    }

    if let Some(email) = &notice.payer_email {
        if let Err(e) = state.email.send_code(email, &code, notice.kind).await {
            error!("Email notification failed: {}", e);
        }
    }

    Ok(code)
}

/// Validate and redeem a promo code
#[instrument(skip(state, request))]
pub async fn validate_promo(
    State(state): State<AppState>,
    Json(request): Json<ValidatePromoRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let code = request
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            validate_error(PromoError::InvalidRequest("no code provided".to_string()))
        })?;

    // The requested service name is passed through as-is; the store
    // compares it against the stored kind only after the code itself has
    // been found, so an unknown code reads as not-found no matter what
    // service the client asked for.
    let redemption = state
        .store
        .redeem(code, request.kind.as_deref())
        .await
        .map_err(validate_error)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Доступ разрешен",
        "data": redemption,
    })))
}

/// Almanac lookup for a birth date
pub async fn almanac(
    Query(query): Query<AlmanacQuery>,
) -> Result<Json<Almanac>, HandlerError> {
    let almanac = Almanac::for_date(query.day, query.month, query.year).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;
    Ok(Json(almanac))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_error_mapping() {
        let (status, _) = webhook_error(PromoError::SignatureMismatch {
            provider: "cloudtips",
        });
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = webhook_error(PromoError::Database("boom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = webhook_error(PromoError::Configuration("no secret".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validate_error_mapping() {
        let (status, body) = validate_error(PromoError::CodeNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Неверный код доступа");

        let (status, body) = validate_error(PromoError::CodeAlreadyUsed);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Этот код уже был использован");

        let (status, _) = validate_error(PromoError::Internal("boom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validate_request_shape() {
        let req: ValidatePromoRequest =
            serde_json::from_str(r#"{"code": "RUNE-AB2C-XY7Z", "type": "sketch"}"#).unwrap();
        assert_eq!(req.code.as_deref(), Some("RUNE-AB2C-XY7Z"));
        assert_eq!(req.kind.as_deref(), Some("sketch"));

        let req: ValidatePromoRequest = serde_json::from_str(r#"{"code": "x"}"#).unwrap();
        assert!(req.kind.is_none());
    }
}
