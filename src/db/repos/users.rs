use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{User, UserRole},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user. Signup flows live elsewhere; this exists for
    /// bootstrap and tests.
    async fn create(&self, email: &str, role: UserRole) -> DbResult<User>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Flip the active flag, returning the updated user.
    /// Fails with `DbError::NotFound` for unknown users.
    async fn set_active(&self, id: Uuid, is_active: bool) -> DbResult<User>;
}
