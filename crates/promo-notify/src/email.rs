//! Email notifier (Resend)

use promo_core::{AccessKind, PromoError, PromoResult};
use reqwest::Client;
use std::env;
use tracing::{debug, info};

const RESEND_API_BASE: &str = "https://api.resend.com";

/// Sends the access code by email through the Resend API.
/// Without an API key the send degrades to a log line so the rest of the
/// fulfilment flow can be exercised locally.
#[derive(Clone)]
pub struct EmailNotifier {
    api_key: Option<String>,
    api_base_url: String,
    from: String,
    client: Client,
}

impl EmailNotifier {
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key,
            api_base_url: RESEND_API_BASE.to_string(),
            from: "Обережье <no-reply@obereje.ru>".to_string(),
            client,
        }
    }

    /// Load the API key from `RESEND_API_KEY`
    pub fn from_env(client: Client) -> Self {
        dotenvy::dotenv().ok();
        Self::new(
            env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty()),
            client,
        )
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Send the freshly minted code to the payer
    pub async fn send_code(&self, to: &str, code: &str, kind: AccessKind) -> PromoResult<()> {
        let Some(api_key) = &self.api_key else {
            info!(%to, %code, kind = %kind, "[email mock] RESEND_API_KEY not set");
            return Ok(());
        };
        if to.is_empty() {
            debug!("empty recipient, skipping email notification");
            return Ok(());
        }

        let payload = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": "Ваш код доступа к Обережью",
            "html": format!(
                "<strong>Здравия!</strong> Услуга: {}. Ваш персональный код: <code>{}</code>",
                kind.service_name(),
                code
            ),
        });

        let response = self
            .client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PromoError::NetworkError(format!("email send failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromoError::NetworkError(format!(
                "Resend API returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_code_hits_resend() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test_key"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = EmailNotifier::new(Some("re_test_key".into()), Client::new())
            .with_api_base_url(server.uri());

        notifier
            .send_code("buyer@example.com", "RUNE-AB2C-XY7Z", AccessKind::Sketch)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unconfigured_is_mock() {
        let notifier = EmailNotifier::new(None, Client::new());
        notifier
            .send_code("buyer@example.com", "RUNE-AB2C-XY7Z", AccessKind::MasterSpread)
            .await
            .unwrap();
    }
}
