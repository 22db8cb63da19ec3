//! Router-level tests exercising the full admin HTTP surface against an
//! in-memory database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tower::ServiceExt;

use crate::{
    AppState, build_app,
    config::AppConfig,
    db::{
        DbPool,
        tests::harness::{
            create_sqlite_pool, run_sqlite_migrations, seed_connector, seed_credential,
            seed_document, seed_pair,
        },
    },
    files::FilesystemFileStore,
    index::HttpDocumentIndex,
    kv::SqliteKvStore,
    queue::{ChannelTaskQueue, CleanupTask},
    services::Services,
};

const ADMIN_TOKEN: &str = "test-admin-token";

struct TestHarness {
    app: Router,
    pool: sqlx::SqlitePool,
    // Keeps the queue open so admitted deletions can enqueue.
    _cleanup_rx: mpsc::Receiver<CleanupTask>,
    _file_root: tempfile::TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_index_url("http://127.0.0.1:1").await
    }

    async fn with_index_url(index_url: &str) -> Self {
        let mut config = AppConfig::default();
        config.auth.admin_token = Some(ADMIN_TOKEN.to_string());
        config.auth.admin_email = Some("admin@example.com".to_string());
        config.features.token_budget_enabled = true;
        config.index.url = index_url.to_string();

        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        let db = Arc::new(DbPool::from_sqlite(pool.clone()));

        let file_root = tempfile::tempdir().expect("tempdir");
        let kv = Arc::new(SqliteKvStore::new(pool.clone()));
        let index = Arc::new(HttpDocumentIndex::new(reqwest::Client::new(), &config.index));
        let file_store = Arc::new(FilesystemFileStore::new(file_root.path()));
        let (queue, cleanup_rx) = ChannelTaskQueue::new(8);

        let services = Services::new(
            &config,
            db.clone(),
            kv,
            index,
            file_store,
            Arc::new(queue),
        );

        let state = AppState {
            config: Arc::new(config),
            db,
            services,
            task_tracker: TaskTracker::new(),
        };

        Self {
            app: build_app(state),
            pool,
            _cleanup_rx: cleanup_rx,
            _file_root: file_root,
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        authed: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if authed {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", ADMIN_TOKEN),
            );
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

#[tokio::test]
async fn health_is_open_and_reports_database() {
    let harness = TestHarness::new().await;
    let (status, body) = harness.send("GET", "/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["subsystems"]["database"]["healthy"], true);

    let (status, _) = harness.send("GET", "/health/live", None, false).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_require_bearer_token() {
    let harness = TestHarness::new().await;
    let (status, _) = harness
        .send("GET", "/manage/admin/doc-boosts", None, false)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = harness
        .send("GET", "/manage/admin/doc-boosts", None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn doc_boosts_lists_ranked_documents() {
    let harness = TestHarness::new().await;
    seed_document(&harness.pool, "doc-a", "A", Some("https://example.com/a"), 5).await;
    seed_document(&harness.pool, "doc-b", "B", None, -1).await;

    let (status, body) = harness
        .send("GET", "/manage/admin/doc-boosts?ascending=true&limit=10", None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["document_id"], "doc-b");
    assert_eq!(body[1]["document_id"], "doc-a");
    // Missing links are surfaced as empty strings.
    assert_eq!(body[0]["link"], "");
}

#[tokio::test]
async fn boost_update_writes_db_then_index() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path(
            "/api/v1/indexes/document_chunks/documents/doc-a/fields",
        ))
        .respond_with(wiremock::ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let harness = TestHarness::with_index_url(&server.uri()).await;
    seed_document(&harness.pool, "doc-a", "A", None, 0).await;

    let (status, _) = harness
        .send(
            "POST",
            "/manage/admin/doc-boosts",
            Some(json!({"document_id": "doc-a", "boost": 7})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn boost_update_unknown_document_is_400() {
    let harness = TestHarness::new().await;
    let (status, body) = harness
        .send(
            "POST",
            "/manage/admin/doc-boosts",
            Some(json!({"document_id": "ghost", "boost": 1})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No document found with ID 'ghost'");
}

#[tokio::test]
async fn genai_key_validation_without_key_is_404() {
    let harness = TestHarness::new().await;
    let (status, _) = harness
        .send("GET", "/manage/admin/genai-api-key/validate", None, true)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deletion_attempt_for_missing_pair_is_404() {
    let harness = TestHarness::new().await;
    let (status, body) = harness
        .send(
            "POST",
            "/manage/admin/deletion-attempt",
            Some(json!({"connector_id": 12, "credential_id": 34})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Connector with ID '12' and credential ID '34' does not exist. \
         Has it already been deleted?"
    );
}

#[tokio::test]
async fn deletion_attempt_on_active_connector_is_400() {
    let harness = TestHarness::new().await;
    let connector_id = seed_connector(&harness.pool, "web", json!({}), false).await;
    let credential_id = seed_credential(&harness.pool).await;
    seed_pair(&harness.pool, connector_id, credential_id).await;

    let (status, body) = harness
        .send(
            "POST",
            "/manage/admin/deletion-attempt",
            Some(json!({"connector_id": connector_id, "credential_id": credential_id})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Connector must be paused before it can be deleted"
    );
}

#[tokio::test]
async fn deletion_attempt_on_paused_pair_is_admitted() {
    let harness = TestHarness::new().await;
    let connector_id = seed_connector(&harness.pool, "web", json!({}), true).await;
    let credential_id = seed_credential(&harness.pool).await;
    seed_pair(&harness.pool, connector_id, credential_id).await;

    let (status, _) = harness
        .send(
            "POST",
            "/manage/admin/deletion-attempt",
            Some(json!({"connector_id": connector_id, "credential_id": credential_id})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn token_budget_settings_round_trip() {
    let harness = TestHarness::new().await;

    let (status, _) = harness
        .send("GET", "/manage/admin/token-budget-settings", None, true)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = harness
        .send(
            "PUT",
            "/manage/admin/token-budget-settings",
            Some(json!({
                "enable_token_budget": true,
                "token_budget": 1000,
                "token_budget_time_period": 24
            })),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token budget settings updated");

    let (status, body) = harness
        .send("GET", "/manage/admin/token-budget-settings", None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_budget"], 1000);
}

#[tokio::test]
async fn invited_user_lifecycle() {
    let harness = TestHarness::new().await;

    let (status, body) = harness
        .send(
            "PUT",
            "/manage/admin/users",
            Some(json!({"emails": ["a@example.com", "b@example.com"]})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(2));

    let (status, body) = harness
        .send(
            "PATCH",
            "/manage/admin/remove-invited-user",
            Some(json!({"user_email": "a@example.com"})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(1));
}

#[tokio::test]
async fn bulk_invite_rejects_malformed_email() {
    let harness = TestHarness::new().await;
    let (status, _) = harness
        .send(
            "PUT",
            "/manage/admin/users",
            Some(json!({"emails": ["not-an-email"]})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_cannot_deactivate_their_own_account() {
    let harness = TestHarness::new().await;

    let (status, body) = harness
        .send(
            "PATCH",
            "/manage/admin/deactivate-user",
            Some(json!({"user_email": "admin@example.com"})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot deactivate yourself");
}

#[tokio::test]
async fn deactivate_unknown_user_is_404() {
    let harness = TestHarness::new().await;
    let (status, _) = harness
        .send(
            "PATCH",
            "/manage/admin/deactivate-user",
            Some(json!({"user_email": "ghost@example.com"})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
