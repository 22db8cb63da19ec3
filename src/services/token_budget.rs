use std::sync::Arc;

use thiserror::Error;

use crate::{
    kv::{ConfigKeys, KvError, KvStore},
    models::TokenBudgetSettings,
};

#[derive(Debug, Error)]
pub enum TokenBudgetError {
    #[error("Token budget is not enabled in the application.")]
    GloballyDisabled,

    #[error("Token budget settings not found.")]
    NotFound,

    #[error("Stored token budget settings are corrupt: {0}")]
    Corrupt(serde_json::Error),

    #[error("Config store error: {0}")]
    Kv(#[from] KvError),
}

/// Token-usage budget configuration, persisted in the KV config store.
/// The query path reads these settings to enforce spend limits; this
/// service only manages them, and only when the deployment enables the
/// feature at all.
#[derive(Clone)]
pub struct TokenBudgetService {
    kv: Arc<dyn KvStore>,
    globally_enabled: bool,
}

impl TokenBudgetService {
    pub fn new(kv: Arc<dyn KvStore>, globally_enabled: bool) -> Self {
        Self {
            kv,
            globally_enabled,
        }
    }

    pub async fn get_settings(&self) -> Result<TokenBudgetSettings, TokenBudgetError> {
        if !self.globally_enabled {
            return Err(TokenBudgetError::GloballyDisabled);
        }

        let value = self
            .kv
            .load(ConfigKeys::TOKEN_BUDGET_SETTINGS)
            .await?
            .ok_or(TokenBudgetError::NotFound)?;

        serde_json::from_value(value).map_err(TokenBudgetError::Corrupt)
    }

    #[tracing::instrument(skip(self, settings))]
    pub async fn update_settings(
        &self,
        settings: &TokenBudgetSettings,
    ) -> Result<(), TokenBudgetError> {
        if !self.globally_enabled {
            return Err(TokenBudgetError::GloballyDisabled);
        }

        let value = serde_json::to_value(settings).map_err(TokenBudgetError::Corrupt)?;
        self.kv.store(ConfigKeys::TOKEN_BUDGET_SETTINGS, &value).await?;
        tracing::info!(
            enabled = settings.enable_token_budget,
            budget = settings.token_budget,
            period_hours = settings.token_budget_time_period,
            "Token budget settings updated"
        );
        Ok(())
    }
}
