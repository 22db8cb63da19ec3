use serde::{Deserialize, Serialize};
use validator::Validate;

/// Global token-usage budget configuration, persisted in the KV config
/// store. Enforcement happens in the query path; this service only reads
/// and writes the settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenBudgetSettings {
    pub enable_token_budget: bool,
    /// Budget in thousands of tokens per period.
    #[validate(range(min = 0))]
    pub token_budget: i64,
    /// Period length in hours.
    #[validate(range(min = 1))]
    pub token_budget_time_period: i64,
}
