use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::common::{parse_role, parse_uuid};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::UserRepo,
    },
    models::{User, UserRole},
};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> DbResult<User> {
        Ok(User {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            email: row.get("email"),
            role: parse_role(&row.get::<String, _>("role"))?,
            is_active: row.get("is_active"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn create(&self, email: &str, role: UserRole) -> DbResult<User> {
        let id = Uuid::new_v4();
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, role)
            VALUES (?, ?, ?)
            RETURNING id, email, role, is_active, created_at, updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(email)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Self::user_from_row(&row)
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, role, is_active, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> DbResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET is_active = ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING id, email, role, is_active, created_at, updated_at
            "#,
        )
        .bind(is_active)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(Self::user_from_row)
            .transpose()?
            .ok_or(DbError::NotFound)
    }
}
