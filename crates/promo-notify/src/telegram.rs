//! Telegram Bot API notifier

use promo_core::{PromoError, PromoResult};
use reqwest::Client;
use std::env;
use tracing::debug;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends messages through the Telegram Bot API.
/// Without a token every send is a logged no-op.
#[derive(Clone)]
pub struct TelegramNotifier {
    token: Option<String>,
    api_base_url: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, client: Client) -> Self {
        Self {
            token,
            api_base_url: TELEGRAM_API_BASE.to_string(),
            client,
        }
    }

    /// Load the bot token from `TELEGRAM_BOT_TOKEN`
    pub fn from_env(client: Client) -> Self {
        dotenvy::dotenv().ok();
        Self::new(
            env::var("TELEGRAM_BOT_TOKEN").ok().filter(|t| !t.is_empty()),
            client,
        )
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Deliver a message to a chat. Returns an error on transport failure
    /// or a non-2xx Bot API response; callers treat both as best-effort.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> PromoResult<()> {
        let Some(token) = &self.token else {
            debug!("TELEGRAM_BOT_TOKEN not set, skipping Telegram notification");
            return Ok(());
        };
        if chat_id.is_empty() {
            debug!("empty chat id, skipping Telegram notification");
            return Ok(());
        }

        let url = format!("{}/bot{}/sendMessage", self.api_base_url, token);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| PromoError::NetworkError(format!("Telegram send failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromoError::NetworkError(format!(
                "Telegram API returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_message_hits_bot_api() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(serde_json::json!({"chat_id": "42"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(Some("123:abc".into()), Client::new())
            .with_api_base_url(server.uri());

        notifier.send_message("42", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(Some("123:abc".into()), Client::new())
            .with_api_base_url(server.uri());

        let err = notifier.send_message("42", "hello").await.unwrap_err();
        assert!(matches!(err, PromoError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_is_noop() {
        let notifier = TelegramNotifier::new(None, Client::new());
        notifier.send_message("42", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_chat_id_is_noop() {
        let notifier = TelegramNotifier::new(Some("123:abc".into()), Client::new());
        notifier.send_message("", "hello").await.unwrap();
    }
}
