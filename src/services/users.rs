use std::{collections::BTreeSet, sync::Arc};

use serde_json::json;
use thiserror::Error;

use crate::{
    db::{DbError, DbPool},
    kv::{ConfigKeys, KvError, KvStore},
};

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Config store error: {0}")]
    Kv(#[from] KvError),
}

/// Invitation and account activation management.
///
/// Invitations are a plain email list in the KV config store: invited
/// users do not have account rows until they complete signup.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
    kv: Arc<dyn KvStore>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>, kv: Arc<dyn KvStore>) -> Self {
        Self { db, kv }
    }

    async fn invited_users(&self) -> Result<BTreeSet<String>, UserServiceError> {
        let value = self.kv.load(ConfigKeys::INVITED_USERS).await?;
        let emails = value
            .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
            .unwrap_or_default();
        Ok(emails.into_iter().collect())
    }

    async fn write_invited_users(
        &self,
        emails: &BTreeSet<String>,
    ) -> Result<usize, UserServiceError> {
        let list: Vec<&String> = emails.iter().collect();
        self.kv.store(ConfigKeys::INVITED_USERS, &json!(list)).await?;
        Ok(emails.len())
    }

    /// Add emails to the invited set, returning the new set size.
    #[tracing::instrument(skip(self, emails), fields(count = emails.len()))]
    pub async fn bulk_invite(&self, emails: Vec<String>) -> Result<usize, UserServiceError> {
        let mut invited = self.invited_users().await?;
        invited.extend(emails);
        self.write_invited_users(&invited).await
    }

    /// Remove an email from the invited set, returning the new set size.
    #[tracing::instrument(skip(self))]
    pub async fn remove_invited(&self, email: &str) -> Result<usize, UserServiceError> {
        let mut invited = self.invited_users().await?;
        invited.remove(email);
        self.write_invited_users(&invited).await
    }

    /// Deactivate a user account. Admins cannot deactivate themselves.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(
        &self,
        email: &str,
        acting_admin_email: Option<&str>,
    ) -> Result<(), UserServiceError> {
        if acting_admin_email == Some(email) {
            return Err(UserServiceError::Invalid(
                "You cannot deactivate yourself".to_string(),
            ));
        }

        let user = self
            .db
            .users()
            .get_by_email(email)
            .await?
            .ok_or(UserServiceError::NotFound)?;

        if !user.is_active {
            tracing::warn!(email, "User is already deactivated");
        }

        self.db.users().set_active(user.id, false).await?;
        Ok(())
    }

    /// Reactivate a user account.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, email: &str) -> Result<(), UserServiceError> {
        let user = self
            .db
            .users()
            .get_by_email(email)
            .await?
            .ok_or(UserServiceError::NotFound)?;

        if user.is_active {
            tracing::warn!(email, "User is already activated");
        }

        self.db.users().set_active(user.id, true).await?;
        Ok(())
    }
}
