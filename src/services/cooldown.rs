//! Cooldown gate for expensive external validation calls.
//!
//! Consults a last-checked timestamp in the KV config store and skips the
//! wrapped call when a check already ran within the cooldown window. The
//! gate bounds cost, not correctness: the timestamp read and write are
//! unsynchronized, so concurrent callers may both validate and both write.
//! Last writer wins, which is fine for an advisory record.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::kv::{KvError, KvStore};

#[derive(Debug, Error)]
pub enum GateError {
    /// The validation target is not set up at all (e.g. no API key
    /// configured). Distinct from a failed check.
    #[error("Generative model is not set up")]
    NotConfigured,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Config store error: {0}")]
    Kv(#[from] KvError),
}

/// Failure modes of the wrapped validation call.
#[derive(Debug)]
pub enum ValidateError {
    NotConfigured,
    Failed(String),
}

/// What the gate did for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// A prior check is recent enough; the validation call was skipped.
    Skipped,
    /// The validation call ran and passed; the timestamp was refreshed.
    Validated,
}

pub struct CooldownGate {
    kv: Arc<dyn KvStore>,
    key: String,
    cooldown: Duration,
}

impl CooldownGate {
    pub fn new(kv: Arc<dyn KvStore>, key: impl Into<String>, cooldown: Duration) -> Self {
        Self {
            kv,
            key: key.into(),
            cooldown,
        }
    }

    /// Run `validate` unless a successful check is recorded within the
    /// cooldown window. On success, the current time is persisted as the
    /// new last-check timestamp, overwriting any prior value.
    ///
    /// A missing record means "never checked" and always validates; that
    /// is the expected first-run state, not an error.
    pub async fn check_and_refresh<F, Fut>(&self, validate: F) -> Result<GateOutcome, GateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ValidateError>>,
    {
        if let Some(value) = self.kv.load(&self.key).await? {
            if let Some(last_check) = value.as_i64() {
                let elapsed = Utc::now().timestamp() - last_check;
                if elapsed < self.cooldown.as_secs() as i64 {
                    tracing::debug!(
                        key = %self.key,
                        elapsed_secs = elapsed,
                        "Within cooldown, skipping validation"
                    );
                    return Ok(GateOutcome::Skipped);
                }
            } else {
                tracing::warn!(key = %self.key, "Unreadable cooldown record, re-validating");
            }
        }

        validate().await.map_err(|e| match e {
            ValidateError::NotConfigured => GateError::NotConfigured,
            ValidateError::Failed(msg) => GateError::ValidationFailed(msg),
        })?;

        // Mark the check as successful. A concurrent validator may have
        // raced ahead; the overwrite is harmless.
        self.kv
            .store(&self.key, &json!(Utc::now().timestamp()))
            .await?;

        Ok(GateOutcome::Validated)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use rstest::rstest;
    use tokio::sync::Mutex;

    use super::*;
    use crate::kv::KvResult;

    #[derive(Default)]
    struct MemoryKv {
        values: Mutex<HashMap<String, serde_json::Value>>,
    }

    #[async_trait]
    impl KvStore for MemoryKv {
        async fn load(&self, key: &str) -> KvResult<Option<serde_json::Value>> {
            Ok(self.values.lock().await.get(key).cloned())
        }

        async fn store(&self, key: &str, value: &serde_json::Value) -> KvResult<()> {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.clone());
            Ok(())
        }

        async fn delete(&self, key: &str) -> KvResult<()> {
            self.values.lock().await.remove(key);
            Ok(())
        }
    }

    fn gate_with_last_check(
        kv: Arc<MemoryKv>,
        cooldown_secs: u64,
        last_check_offset_secs: Option<i64>,
    ) -> CooldownGate {
        if let Some(offset) = last_check_offset_secs {
            let ts = Utc::now().timestamp() - offset;
            kv.values
                .try_lock()
                .unwrap()
                .insert("check_time".to_string(), json!(ts));
        }
        CooldownGate::new(kv, "check_time", Duration::from_secs(cooldown_secs))
    }

    #[tokio::test]
    async fn first_run_always_validates_and_records_timestamp() {
        let kv = Arc::new(MemoryKv::default());
        let gate = gate_with_last_check(kv.clone(), 3600, None);
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .check_and_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(outcome, GateOutcome::Validated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let recorded = kv.load("check_time").await.unwrap().unwrap();
        let drift = Utc::now().timestamp() - recorded.as_i64().unwrap();
        assert!(drift.abs() < 5);
    }

    #[rstest]
    #[case::well_within_window(3600, 10)]
    #[case::just_inside_window(3600, 3590)]
    #[case::future_timestamp_from_clock_skew(3600, -100)]
    #[tokio::test]
    async fn within_cooldown_never_invokes_validate(
        #[case] cooldown_secs: u64,
        #[case] elapsed_secs: i64,
    ) {
        let kv = Arc::new(MemoryKv::default());
        let gate = gate_with_last_check(kv, cooldown_secs, Some(elapsed_secs));
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .check_and_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(outcome, GateOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case::exactly_at_window(3600, 3600)]
    #[case::long_expired(60, 7200)]
    #[tokio::test]
    async fn elapsed_cooldown_revalidates_and_advances_timestamp(
        #[case] cooldown_secs: u64,
        #[case] elapsed_secs: i64,
    ) {
        let kv = Arc::new(MemoryKv::default());
        let gate = gate_with_last_check(kv.clone(), cooldown_secs, Some(elapsed_secs));
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .check_and_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(outcome, GateOutcome::Validated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The fresh timestamp puts the next call back inside the window.
        let outcome = gate
            .check_and_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(outcome, GateOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_configured_surfaces_without_recording_timestamp() {
        let kv = Arc::new(MemoryKv::default());
        let gate = gate_with_last_check(kv.clone(), 3600, None);

        let err = gate
            .check_and_refresh(|| async { Err(ValidateError::NotConfigured) })
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::NotConfigured));
        assert!(kv.load("check_time").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn validation_failure_carries_message_and_skips_recording() {
        let kv = Arc::new(MemoryKv::default());
        let gate = gate_with_last_check(kv.clone(), 3600, Some(7200));

        let err = gate
            .check_and_refresh(|| async {
                Err(ValidateError::Failed("Incorrect API key provided".into()))
            })
            .await
            .unwrap_err();

        match err {
            GateError::ValidationFailed(msg) => {
                assert_eq!(msg, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // The stale timestamp is untouched, so the next call validates again.
        let calls = AtomicUsize::new(0);
        gate.check_and_refresh(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreadable_record_falls_back_to_validating() {
        let kv = Arc::new(MemoryKv::default());
        kv.store("check_time", &json!("not-a-timestamp"))
            .await
            .unwrap();
        let gate = CooldownGate::new(kv, "check_time", Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        let outcome = gate
            .check_and_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(outcome, GateOutcome::Validated);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
