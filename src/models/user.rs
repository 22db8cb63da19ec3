use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Basic,
    Admin,
}

impl UserRole {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Admin => "admin",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body identifying a user by email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserByEmail {
    #[validate(email)]
    pub user_email: String,
}

/// Request body for bulk-inviting users by email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkInviteRequest {
    #[validate(length(min = 1), custom(function = "crate::models::validate_emails"))]
    pub emails: Vec<String>,
}

/// Validate every entry of a bulk email list.
pub fn validate_emails(emails: &[String]) -> Result<(), validator::ValidationError> {
    for email in emails {
        if !validator::ValidateEmail::validate_email(&email.as_str()) {
            let mut err = validator::ValidationError::new("invalid_email");
            err.message = Some(format!("'{}' is not a valid email address", email).into());
            return Err(err);
        }
    }
    Ok(())
}
