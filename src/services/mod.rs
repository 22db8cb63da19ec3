pub mod cooldown;
pub mod deletion;
pub mod documents;
pub mod genai_key;
pub mod token_budget;
pub mod users;

use std::sync::Arc;

pub use cooldown::{CooldownGate, GateError, GateOutcome, ValidateError};
pub use deletion::{DbDeletionPolicy, DeletionError, DeletionService};
pub use documents::{DocumentError, DocumentService};
pub use genai_key::GenAiKeyService;
pub use token_budget::{TokenBudgetError, TokenBudgetService};
pub use users::{UserService, UserServiceError};

use crate::{
    config::AppConfig, db::DbPool, files::FileStore, index::DocumentIndex, kv::KvStore,
    queue::TaskQueue,
};

/// All request-facing services, wired once at startup and cloned into
/// handlers through application state.
#[derive(Clone)]
pub struct Services {
    pub documents: DocumentService,
    pub users: UserService,
    pub token_budget: TokenBudgetService,
    pub genai_key: GenAiKeyService,
    pub deletion: DeletionService,
}

impl Services {
    pub fn new(
        config: &AppConfig,
        db: Arc<DbPool>,
        kv: Arc<dyn KvStore>,
        index: Arc<dyn DocumentIndex>,
        file_store: Arc<dyn FileStore>,
        queue: Arc<dyn TaskQueue>,
    ) -> Self {
        let policy = Arc::new(DbDeletionPolicy::new(
            db.index_attempts(),
            db.deletion_attempts(),
        ));

        Self {
            documents: DocumentService::new(db.clone(), index),
            users: UserService::new(db.clone(), kv.clone()),
            token_budget: TokenBudgetService::new(
                kv.clone(),
                config.features.token_budget_enabled,
            ),
            genai_key: GenAiKeyService::new(kv, config.llm.clone()),
            deletion: DeletionService::new(
                db.connector_pairs(),
                db.index_attempts(),
                policy,
                queue,
                file_store,
            ),
        }
    }
}
