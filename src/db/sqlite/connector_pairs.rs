use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::common::parse_source;
use crate::{
    db::{error::DbResult, repos::ConnectorPairRepo},
    models::{Connector, ConnectorCredentialPair},
};

pub struct SqliteConnectorPairRepo {
    pool: SqlitePool,
}

impl SqliteConnectorPairRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectorPairRepo for SqliteConnectorPairRepo {
    async fn get(
        &self,
        connector_id: i64,
        credential_id: i64,
    ) -> DbResult<Option<ConnectorCredentialPair>> {
        let row = sqlx::query(
            r#"
            SELECT ccp.credential_id, ccp.name AS pair_name, ccp.created_at AS pair_created_at,
                   c.id, c.name, c.source, c.connector_specific_config, c.disabled,
                   c.created_at, c.updated_at
            FROM connector_credential_pairs ccp
            INNER JOIN connectors c ON c.id = ccp.connector_id
            WHERE ccp.connector_id = ? AND ccp.credential_id = ?
            "#,
        )
        .bind(connector_id)
        .bind(credential_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let config: String = row.get("connector_specific_config");
        let connector = Connector {
            id: row.get("id"),
            name: row.get("name"),
            source: parse_source(&row.get::<String, _>("source"))?,
            connector_specific_config: serde_json::from_str(&config)?,
            disabled: row.get("disabled"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        Ok(Some(ConnectorCredentialPair {
            connector,
            credential_id: row.get("credential_id"),
            name: row.get("pair_name"),
            created_at: row.get("pair_created_at"),
        }))
    }

    async fn delete(&self, connector_id: i64, credential_id: i64) -> DbResult<()> {
        sqlx::query(
            "DELETE FROM connector_credential_pairs WHERE connector_id = ? AND credential_id = ?",
        )
        .bind(connector_id)
        .bind(credential_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
