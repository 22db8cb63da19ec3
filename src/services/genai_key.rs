use std::{sync::Arc, time::Duration};

use super::cooldown::{CooldownGate, GateError, GateOutcome, ValidateError};
use crate::{
    config::LlmConfig,
    kv::{ConfigKeys, KvStore},
    llm::{GenAiClient, GenAiError},
};

/// Cooldown-gated validation of the configured generative-model API key.
///
/// Validation is a real completion round trip, so it costs tokens and
/// counts against provider rate limits; the gate keeps repeated admin-UI
/// polls from hammering the provider.
#[derive(Clone)]
pub struct GenAiKeyService {
    gate: Arc<CooldownGate>,
    llm_config: LlmConfig,
}

impl GenAiKeyService {
    pub fn new(kv: Arc<dyn KvStore>, llm_config: LlmConfig) -> Self {
        let gate = CooldownGate::new(
            kv,
            ConfigKeys::GENAI_API_KEY_LAST_CHECK_TIME,
            Duration::from_secs(llm_config.key_check_cooldown_secs),
        );
        Self {
            gate: Arc::new(gate),
            llm_config,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn validate_key(&self) -> Result<GateOutcome, GateError> {
        let config = self.llm_config.clone();
        self.gate
            .check_and_refresh(move || async move {
                let client = GenAiClient::from_config(&config).map_err(|e| match e {
                    GenAiError::NotConfigured => ValidateError::NotConfigured,
                    other => ValidateError::Failed(other.to_string()),
                })?;
                client
                    .test_connection()
                    .await
                    .map_err(|e| ValidateError::Failed(e.to_string()))
            })
            .await
    }
}
