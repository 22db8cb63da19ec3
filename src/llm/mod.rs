//! Generative model client.
//!
//! The management server only exercises the connectivity path: building a
//! client from configuration and running a minimal completion to verify
//! the configured API key. The query path owns actual generation.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Generative model is not set up")]
    NotConfigured,

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("{0}")]
    Request(String),
}

/// Minimal client for the configured generative model provider.
#[derive(Debug)]
pub struct GenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GenAiClient {
    /// Build a client from config. Fails with `NotConfigured` when no API
    /// key is set, which callers surface as "not set up" rather than a
    /// validation failure.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenAiError> {
        let api_key = config.api_key.clone().ok_or(GenAiError::NotConfigured)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GenAiError::Client)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Run a one-token completion to prove the key and endpoint work.
    /// Returns the provider's message on substantive failure.
    #[tracing::instrument(skip(self), fields(model = %self.model))]
    pub async fn test_connection(&self) -> Result<(), GenAiError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": "Test"}],
            "max_tokens": 1,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::Request(format!("Generative model unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Generative model key check passed");
            return Ok(());
        }

        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| format!("provider returned {}", status));

        Err(GenAiError::Request(detail))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;
    use crate::config::LlmConfig;

    fn llm_config(api_base: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(|k| k.to_string()),
            api_base: api_base.to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
            key_check_cooldown_secs: 3600,
        }
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = GenAiClient::from_config(&llm_config("http://localhost", None)).unwrap_err();
        assert!(matches!(err, GenAiError::NotConfigured));
    }

    #[tokio::test]
    async fn valid_key_passes_connectivity_check() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GenAiClient::from_config(&llm_config(&server.uri(), Some("sk-good"))).unwrap();
        client.test_connection().await.expect("check should pass");
    }

    #[tokio::test]
    async fn provider_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let client = GenAiClient::from_config(&llm_config(&server.uri(), Some("sk-bad"))).unwrap();
        let err = client.test_connection().await.unwrap_err();
        match err {
            GenAiError::Request(msg) => assert_eq!(msg, "Incorrect API key provided"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
