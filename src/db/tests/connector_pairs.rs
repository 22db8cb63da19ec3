use serde_json::json;

use super::harness::{create_sqlite_pool, run_sqlite_migrations, seed_connector, seed_credential, seed_pair};
use crate::{db::DbPool, models::DocumentSource};

async fn db() -> (sqlx::SqlitePool, DbPool) {
    let pool = create_sqlite_pool().await;
    run_sqlite_migrations(&pool).await;
    let db = DbPool::from_sqlite(pool.clone());
    (pool, db)
}

#[tokio::test]
async fn get_loads_pair_with_connector() {
    let (pool, db) = db().await;
    let connector_id = seed_connector(
        &pool,
        "file",
        json!({"file_locations": ["uploads/report.pdf"]}),
        true,
    )
    .await;
    let credential_id = seed_credential(&pool).await;
    seed_pair(&pool, connector_id, credential_id).await;

    let pair = db
        .connector_pairs()
        .get(connector_id, credential_id)
        .await
        .unwrap()
        .expect("pair exists");

    assert_eq!(pair.connector.id, connector_id);
    assert_eq!(pair.credential_id, credential_id);
    assert_eq!(pair.connector.source, DocumentSource::File);
    assert!(pair.connector.disabled);
    assert_eq!(
        pair.connector.file_locations(),
        vec!["uploads/report.pdf".to_string()]
    );
}

#[tokio::test]
async fn get_missing_pair_is_none() {
    let (pool, db) = db().await;
    let connector_id = seed_connector(&pool, "web", json!({}), false).await;
    let credential_id = seed_credential(&pool).await;
    // Pair row never created: connector and credential alone don't pair up.
    let pair = db
        .connector_pairs()
        .get(connector_id, credential_id)
        .await
        .unwrap();
    assert!(pair.is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (pool, db) = db().await;
    let connector_id = seed_connector(&pool, "web", json!({}), true).await;
    let credential_id = seed_credential(&pool).await;
    seed_pair(&pool, connector_id, credential_id).await;

    db.connector_pairs()
        .delete(connector_id, credential_id)
        .await
        .unwrap();
    assert!(
        db.connector_pairs()
            .get(connector_id, credential_id)
            .await
            .unwrap()
            .is_none()
    );

    // Second delete of the same pair must not error.
    db.connector_pairs()
        .delete(connector_id, credential_id)
        .await
        .unwrap();
}
