//! Redemption flow against a live Postgres.
//!
//! `#[sqlx::test]` spins up a per-test database and applies the migrations
//! under `./migrations`. Gated behind the `pg-tests` feature so the default
//! test run does not require a database:
//! `cargo test -p promo-store --features pg-tests`
#![cfg(feature = "pg-tests")]

use promo_core::{AccessKind, PromoError};
use promo_store::PromoStore;
use sqlx::PgPool;

fn meta() -> serde_json::Value {
    serde_json::json!({ "provider": "cloudtips" })
}

#[sqlx::test]
async fn redeem_unknown_code_is_not_found(pool: PgPool) {
    let store = PromoStore::new(pool);

    // The code lookup comes first, so even a nonsense service name still
    // reads as not-found.
    let err = store
        .redeem("RUNE-ZZZZ-ZZZZ", Some("garbage"))
        .await
        .unwrap_err();
    assert!(matches!(err, PromoError::CodeNotFound));
}

#[sqlx::test]
async fn redeem_flips_is_used_once(pool: PgPool) {
    let store = PromoStore::new(pool);
    let code = store.issue_fresh(AccessKind::Sketch, meta()).await.unwrap();

    let redemption = store.redeem(&code, Some("sketch")).await.unwrap();
    assert_eq!(redemption.kind, AccessKind::Sketch);
    assert_eq!(redemption.use_limit, Some(5));

    let row = store.find(&code).await.unwrap().unwrap();
    assert!(row.is_used);
    assert!(row.used_at.is_some());

    let err = store.redeem(&code, Some("sketch")).await.unwrap_err();
    assert!(matches!(err, PromoError::CodeAlreadyUsed));
}

#[sqlx::test]
async fn redeem_checks_service_after_existence(pool: PgPool) {
    let store = PromoStore::new(pool);
    let code = store
        .issue_fresh(AccessKind::MasterSpread, meta())
        .await
        .unwrap();

    let err = store.redeem(&code, Some("sketch")).await.unwrap_err();
    assert!(matches!(err, PromoError::WrongService { .. }));

    // A wrong-service attempt must not burn the code
    let redemption = store.redeem(&code, Some("master_spread")).await.unwrap();
    assert_eq!(redemption.kind, AccessKind::MasterSpread);
    assert_eq!(redemption.use_limit, None);
}

#[sqlx::test]
async fn concurrent_redemptions_settle_in_the_database(pool: PgPool) {
    let store = PromoStore::new(pool);
    let code = store.issue_fresh(AccessKind::Sketch, meta()).await.unwrap();

    let (a, b) = tokio::join!(
        store.redeem(&code, Some("sketch")),
        store.redeem(&code, Some("sketch")),
    );

    // Exactly one of the two wins; the loser sees the already-used error
    // whether it lost the read or the conditional update.
    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in [a, b] {
        if let Err(e) = r {
            assert!(matches!(e, PromoError::CodeAlreadyUsed));
        }
    }
}

#[sqlx::test]
async fn duplicate_code_insert_is_rejected(pool: PgPool) {
    let store = PromoStore::new(pool);

    store
        .issue("RUNE-AB2C-XY7Z", AccessKind::Sketch, meta())
        .await
        .unwrap();
    // Same code, different casing: normalization makes it a duplicate
    let err = store
        .issue("rune-ab2c-xy7z", AccessKind::Sketch, meta())
        .await
        .unwrap_err();
    assert!(matches!(err, PromoError::Database(_)));
}

#[sqlx::test]
async fn issue_fresh_mints_distinct_codes(pool: PgPool) {
    let store = PromoStore::new(pool);

    let first = store.issue_fresh(AccessKind::Sketch, meta()).await.unwrap();
    let second = store.issue_fresh(AccessKind::Sketch, meta()).await.unwrap();
    assert_ne!(first, second);

    // Codes are handed out upper-cased but stored lower-cased
    assert!(first.starts_with("RUNE-"));
    let row = store.find(&first).await.unwrap().unwrap();
    assert_eq!(row.code, first.to_lowercase());
}
