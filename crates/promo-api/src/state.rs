//! # Application State
//!
//! Shared state for the Axum application: the promo-code store, the two
//! payment gateways, and the notifiers (which share one HTTP client).

use promo_gateways::{CloudTipsGateway, YooMoneyGateway};
use promo_notify::{EmailNotifier, TelegramNotifier};
use promo_store::PromoStore;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Postgres connection string
    pub database_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables. `DATABASE_URL` is the only
    /// required variable.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address: {}", e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Promo code store
    pub store: PromoStore,
    /// CloudTips gateway
    pub cloudtips: Arc<CloudTipsGateway>,
    /// YooMoney gateway
    pub yoomoney: Arc<YooMoneyGateway>,
    /// Telegram notifier
    pub telegram: TelegramNotifier,
    /// Email notifier
    pub email: EmailNotifier,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build the full state from the environment: connect the database,
    /// apply migrations, wire up the gateways and notifiers.
    pub async fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = PromoStore::connect(&config.database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
        store
            .run_migrations()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            store,
            cloudtips: Arc::new(CloudTipsGateway::from_env()),
            yoomoney: Arc::new(YooMoneyGateway::from_env()),
            telegram: TelegramNotifier::from_env(client.clone()),
            email: EmailNotifier::from_env(client),
            config,
        })
    }

    /// Assemble state from parts (for testing)
    pub fn new(
        store: PromoStore,
        cloudtips: CloudTipsGateway,
        yoomoney: YooMoneyGateway,
        telegram: TelegramNotifier,
        email: EmailNotifier,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            cloudtips: Arc::new(cloudtips),
            yoomoney: Arc::new(yoomoney),
            telegram,
            email,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "postgres://localhost/obereje".to_string(),
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_production_flag() {
        let mut config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "postgres://localhost/obereje".to_string(),
            environment: "development".to_string(),
        };
        assert!(!config.is_production());

        config.environment = "production".to_string();
        assert!(config.is_production());
    }
}
