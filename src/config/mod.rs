//! Configuration for the management server.
//!
//! The server is configured via a TOML file. All sections are optional
//! with sensible defaults, allowing minimal configuration for local
//! development:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [llm]
//! api_key = "sk-..."
//! ```

use std::{net::IpAddr, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration for the management server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Generative model access for answer generation. The admin surface
    /// only validates connectivity; the query path consumes it.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Document index the platform searches against.
    #[serde(default)]
    pub index: IndexConfig,

    /// Storage for files uploaded through file-type connectors.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub features: FeaturesConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, or defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body size limit in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> IpAddr {
    "127.0.0.1".parse().expect("valid literal")
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

/// SQLite database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            create_if_missing: true,
        }
    }
}

fn default_db_path() -> String {
    "alexandria.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Admin API authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Bearer token required on `/manage/admin/*` routes. When unset, the
    /// admin surface is open (local development only).
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Email of the operator behind the admin token. Used for the
    /// self-deactivation guard.
    #[serde(default)]
    pub admin_email: Option<String>,
}

/// Generative model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key for the generative model provider. When unset, the
    /// platform runs in search-only mode and key validation reports
    /// "not set up".
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for the connectivity probe, in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Minimum time between repeated key-validation calls, in seconds.
    #[serde(default = "default_key_check_cooldown")]
    pub key_check_cooldown_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            timeout_secs: default_llm_timeout(),
            key_check_cooldown_secs: default_key_check_cooldown(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u64 {
    10
}

fn default_key_check_cooldown() -> u64 {
    86400
}

/// Document index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Name of the serving index.
    #[serde(default = "default_primary_index")]
    pub primary_index: String,

    /// Name of a rebuild-in-progress index, if an embedding model swap is
    /// underway. Metadata updates fan out to both.
    #[serde(default)]
    pub secondary_index: Option<String>,

    #[serde(default = "default_index_timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            primary_index: default_primary_index(),
            secondary_index: None,
            timeout_secs: default_index_timeout(),
        }
    }
}

fn default_index_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_primary_index() -> String {
    "document_chunks".to_string()
}

fn default_index_timeout() -> u64 {
    30
}

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Root directory for files uploaded through file connectors.
    #[serde(default = "default_file_root")]
    pub file_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_root: default_file_root(),
        }
    }
}

fn default_file_root() -> String {
    "file_connector_storage".to_string()
}

/// Feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Whether token-budget enforcement is available at all. When off,
    /// the budget-settings endpoints refuse to operate.
    #[serde(default)]
    pub token_budget_enabled: bool,

    /// Queue depth for the connector cleanup worker.
    #[serde(default = "default_cleanup_queue_capacity")]
    pub cleanup_queue_capacity: usize,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            token_budget_enabled: false,
            cleanup_queue_capacity: default_cleanup_queue_capacity(),
        }
    }
}

fn default_cleanup_queue_capacity() -> usize {
    64
}
