use serde_json::json;

use super::harness::{create_sqlite_pool, run_sqlite_migrations, seed_connector, seed_credential};
use crate::{db::DbPool, models::IndexAttemptStatus};

async fn setup() -> (DbPool, i64, i64) {
    let pool = create_sqlite_pool().await;
    run_sqlite_migrations(&pool).await;
    let db = DbPool::from_sqlite(pool.clone());
    let connector_id = seed_connector(&pool, "web", json!({}), false).await;
    let credential_id = seed_credential(&pool).await;
    (db, connector_id, credential_id)
}

#[tokio::test]
async fn create_starts_not_started() {
    let (db, connector_id, credential_id) = setup().await;

    let attempt = db
        .index_attempts()
        .create(connector_id, credential_id, false)
        .await
        .unwrap();
    assert_eq!(attempt.status, IndexAttemptStatus::NotStarted);
    assert!(attempt.status.is_live());
    assert!(!attempt.targets_secondary);

    let fetched = db.index_attempts().get(attempt.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, attempt.id);
}

#[tokio::test]
async fn cancel_hits_only_live_attempts() {
    let (db, connector_id, credential_id) = setup().await;
    let repo = db.index_attempts();

    let scheduled = repo.create(connector_id, credential_id, false).await.unwrap();
    let running = repo.create(connector_id, credential_id, false).await.unwrap();
    repo.mark_in_progress(running.id).await.unwrap();

    let cancelled = repo.cancel_for_connector(connector_id, false).await.unwrap();
    assert_eq!(cancelled, 2);

    for id in [scheduled.id, running.id] {
        let attempt = repo.get(id).await.unwrap().unwrap();
        assert_eq!(attempt.status, IndexAttemptStatus::Canceled);
        assert!(!attempt.status.is_live());
    }

    // Already-cancelled attempts are not counted again.
    let cancelled = repo.cancel_for_connector(connector_id, false).await.unwrap();
    assert_eq!(cancelled, 0);
}

#[tokio::test]
async fn cancel_skips_secondary_attempts_unless_included() {
    let (db, connector_id, credential_id) = setup().await;
    let repo = db.index_attempts();

    let primary = repo.create(connector_id, credential_id, false).await.unwrap();
    let secondary = repo.create(connector_id, credential_id, true).await.unwrap();

    let cancelled = repo.cancel_for_connector(connector_id, false).await.unwrap();
    assert_eq!(cancelled, 1);
    assert_eq!(
        repo.get(primary.id).await.unwrap().unwrap().status,
        IndexAttemptStatus::Canceled
    );
    assert_eq!(
        repo.get(secondary.id).await.unwrap().unwrap().status,
        IndexAttemptStatus::NotStarted
    );

    let cancelled = repo.cancel_for_connector(connector_id, true).await.unwrap();
    assert_eq!(cancelled, 1);
    assert_eq!(
        repo.get(secondary.id).await.unwrap().unwrap().status,
        IndexAttemptStatus::Canceled
    );
}

#[tokio::test]
async fn in_progress_exists_tracks_status() {
    let (db, connector_id, credential_id) = setup().await;
    let repo = db.index_attempts();

    assert!(!repo.in_progress_exists(connector_id, credential_id).await.unwrap());

    let attempt = repo.create(connector_id, credential_id, false).await.unwrap();
    // Scheduled work is not in progress yet.
    assert!(!repo.in_progress_exists(connector_id, credential_id).await.unwrap());

    repo.mark_in_progress(attempt.id).await.unwrap();
    assert!(repo.in_progress_exists(connector_id, credential_id).await.unwrap());

    repo.cancel_for_connector(connector_id, true).await.unwrap();
    assert!(!repo.in_progress_exists(connector_id, credential_id).await.unwrap());
}

#[tokio::test]
async fn delete_for_pair_drops_all_rows() {
    let (db, connector_id, credential_id) = setup().await;
    let repo = db.index_attempts();

    repo.create(connector_id, credential_id, false).await.unwrap();
    repo.create(connector_id, credential_id, true).await.unwrap();

    let deleted = repo.delete_for_pair(connector_id, credential_id).await.unwrap();
    assert_eq!(deleted, 2);
    let deleted = repo.delete_for_pair(connector_id, credential_id).await.unwrap();
    assert_eq!(deleted, 0);
}
