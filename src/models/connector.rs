use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of upstream a connector pulls documents from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Web,
    GoogleDrive,
    Slack,
    Github,
    Confluence,
    /// Files uploaded directly through the UI. These have locally-stored
    /// file content that must be reaped when the connector is deleted.
    File,
}

impl DocumentSource {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::GoogleDrive => "google_drive",
            Self::Slack => "slack",
            Self::Github => "github",
            Self::Confluence => "confluence",
            Self::File => "file",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "web" => Some(Self::Web),
            "google_drive" => Some(Self::GoogleDrive),
            "slack" => Some(Self::Slack),
            "github" => Some(Self::Github),
            "confluence" => Some(Self::Confluence),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured data connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: i64,
    pub name: String,
    pub source: DocumentSource,
    /// Source-specific configuration. For `File` connectors this carries
    /// the `file_locations` list of locally-stored upload paths.
    pub connector_specific_config: serde_json::Value,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connector {
    /// File locations referenced by a `File` connector's configuration.
    /// Empty for other source types or when the key is absent.
    pub fn file_locations(&self) -> Vec<String> {
        self.connector_specific_config
            .get("file_locations")
            .and_then(|v| v.as_array())
            .map(|locations| {
                locations
                    .iter()
                    .filter_map(|l| l.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A connector together with the credential used to access it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorCredentialPair {
    pub connector: Connector,
    pub credential_id: i64,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Identifies a connector/credential pair in deletion requests.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ConnectorCredentialPairIdentifier {
    pub connector_id: i64,
    pub credential_id: i64,
}

/// Lifecycle of a single indexing run for a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexAttemptStatus {
    NotStarted,
    InProgress,
    Success,
    Failed,
    Canceled,
}

impl IndexAttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Attempts in these states still hold or will claim indexing work.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress)
    }
}

impl fmt::Display for IndexAttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work that ingests/refreshes documents from a connector into
/// the search index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAttempt {
    pub id: i64,
    pub connector_id: i64,
    pub credential_id: i64,
    pub status: IndexAttemptStatus,
    /// Whether this attempt feeds the rebuild-in-progress (secondary) index.
    pub targets_secondary: bool,
    pub error_msg: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a connector/credential pair deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionAttemptStatus {
    InProgress,
    Success,
    Failed,
}

impl DeletionAttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

}

impl fmt::Display for DeletionAttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
