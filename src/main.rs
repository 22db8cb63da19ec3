//! Alexandria management server.
//!
//! Administrative control plane for a document-search platform: document
//! ranking overrides, connector deletion, invited-user management, token
//! budgets, and generative-model key validation.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware::from_fn_with_state, routing::get};
use clap::Parser;
use tokio_util::task::TaskTracker;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

mod config;
mod db;
mod files;
mod index;
mod jobs;
mod kv;
mod llm;
mod middleware;
mod models;
mod queue;
mod routes;
mod services;

#[cfg(test)]
mod tests;

use crate::{
    config::AppConfig, db::DbPool, files::FilesystemFileStore, index::HttpDocumentIndex,
    kv::SqliteKvStore, queue::ChannelTaskQueue, services::Services,
};

#[derive(Parser, Debug)]
#[command(version, about = "Alexandria management server", long_about = None)]
struct Args {
    /// Path to config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen host.
    #[arg(long)]
    host: Option<std::net::IpAddr>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

/// Shared application state cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DbPool>,
    pub services: Services,
    pub task_tracker: TaskTracker,
}

impl AppState {
    /// Wire up the database, collaborators, services, and the cleanup
    /// worker.
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(DbPool::from_config(&config.database).await?);
        db.run_migrations().await?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.index.timeout_secs))
            .build()?;

        let kv = Arc::new(SqliteKvStore::new(db.sqlite_pool().clone()));
        let document_index = Arc::new(HttpDocumentIndex::new(http_client, &config.index));
        let file_store = Arc::new(FilesystemFileStore::new(config.storage.file_root.clone()));
        let (queue, cleanup_rx) = ChannelTaskQueue::new(config.features.cleanup_queue_capacity);

        let services = Services::new(
            &config,
            db.clone(),
            kv,
            document_index.clone(),
            file_store,
            Arc::new(queue),
        );

        let task_tracker = TaskTracker::new();
        task_tracker.spawn(jobs::start_connector_cleanup_worker(
            db.clone(),
            document_index,
            cleanup_rx,
        ));

        Ok(Self {
            config: Arc::new(config),
            db,
            services,
            task_tracker,
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    let admin = routes::admin::admin_router().route_layer(from_fn_with_state(
        state.clone(),
        middleware::admin_auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health/live", get(routes::health::liveness_check))
        .nest("/manage/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(
            state.config.server.body_limit_bytes,
        ))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alexandria=debug".into()),
        )
        .init();

    let mut config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.auth.admin_token.is_none() {
        tracing::warn!(
            "No admin token configured; the admin surface is open. \
             Set auth.admin_token before exposing this server."
        );
    }

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let task_tracker = state.task_tracker.clone();
    let app = build_app(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(task_tracker))
        .await
    {
        tracing::error!(error = %e, "Server error");
    }
}

/// Wait for SIGINT/SIGTERM, then drain background tasks.
async fn shutdown_signal(task_tracker: TaskTracker) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, waiting for background tasks");
    task_tracker.close();

    let wait_result =
        tokio::time::timeout(std::time::Duration::from_secs(30), task_tracker.wait()).await;
    match wait_result {
        Ok(()) => tracing::info!("All background tasks completed"),
        Err(_) => tracing::warn!("Timeout waiting for background tasks"),
    }
}
