//! Promo code store over Postgres

use crate::model::{PromoCodeRow, Redemption};
use promo_core::{mint_code, normalize_code, AccessKind, PromoError, PromoResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Attempts at minting a fresh code before giving up on unique-constraint
/// collisions. With a 2^40 code space a single collision is already news.
const MINT_ATTEMPTS: usize = 3;

/// Postgres-backed promo code store
#[derive(Clone)]
pub struct PromoStore {
    pool: PgPool,
}

impl PromoStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and build the pool
    pub async fn connect(database_url: &str) -> PromoResult<Self> {
        info!("Initializing database pool");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Apply embedded migrations
    pub async fn run_migrations(&self) -> PromoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PromoError::Database(format!("migration failed: {}", e)))
    }

    /// Insert a code issued for a confirmed payment. The code is stored
    /// lower-cased; `use_limit` comes from the access kind.
    #[instrument(skip(self, metadata), fields(kind = %kind))]
    pub async fn issue(
        &self,
        code: &str,
        kind: AccessKind,
        metadata: serde_json::Value,
    ) -> PromoResult<()> {
        self.try_insert(code, kind, metadata).await.map_err(db_err)
    }

    async fn try_insert(
        &self,
        code: &str,
        kind: AccessKind,
        metadata: serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO promocodes (code, kind, use_limit, metadata)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(normalize_code(code))
        .bind(kind.as_str())
        .bind(kind.use_limit())
        .bind(metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mint a fresh code and insert it, retrying on the (astronomically
    /// unlikely) unique-constraint collision. Returns the code as shown to
    /// the customer, upper-cased with dashes.
    pub async fn issue_fresh(
        &self,
        kind: AccessKind,
        metadata: serde_json::Value,
    ) -> PromoResult<String> {
        for attempt in 1..=MINT_ATTEMPTS {
            let code = mint_code();
            match self.try_insert(&code, kind, metadata.clone()).await {
                Ok(()) => return Ok(code),
                Err(e) if is_unique_violation(&e) => {
                    warn!(attempt, "minted code collided, retrying");
                }
                Err(e) => return Err(db_err(e)),
            }
        }
        Err(PromoError::Internal(format!(
            "could not mint a unique code in {} attempts",
            MINT_ATTEMPTS
        )))
    }

    /// Look up a code without redeeming it
    pub async fn find(&self, code: &str) -> PromoResult<Option<PromoCodeRow>> {
        sqlx::query_as::<_, PromoCodeRow>(
            r#"
            SELECT id, code, kind, use_limit, is_used, used_at, metadata, created_at
            FROM promocodes
            WHERE code = $1
            "#,
        )
        .bind(normalize_code(code))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Redeem a code: check it exists, is unused, and matches the requested
    /// service, then flip `is_used`. The checks run in that order so an
    /// unknown code reads as not-found regardless of what service the
    /// caller asked for. The flip is conditional on `is_used = FALSE`, so a
    /// concurrent duplicate redemption loses with
    /// [`PromoError::CodeAlreadyUsed`].
    #[instrument(skip(self), fields(code = %normalize_code(code)))]
    pub async fn redeem(
        &self,
        code: &str,
        requested: Option<&str>,
    ) -> PromoResult<Redemption> {
        let row = self
            .find(code)
            .await?
            .ok_or(PromoError::CodeNotFound)?;

        row.check_redeemable(requested)?;

        let result = sqlx::query(
            r#"
            UPDATE promocodes
            SET is_used = TRUE, used_at = NOW()
            WHERE id = $1 AND is_used = FALSE
            "#,
        )
        .bind(row.id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            // Someone redeemed it between our read and write
            return Err(PromoError::CodeAlreadyUsed);
        }

        let kind = row.access_kind().ok_or_else(|| {
            PromoError::Internal(format!("unknown access kind in store: {}", row.kind))
        })?;

        info!(kind = %kind, "promo code redeemed");

        Ok(Redemption {
            kind,
            use_limit: row.use_limit,
        })
    }
}

fn db_err(e: sqlx::Error) -> PromoError {
    PromoError::Database(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
