//! PostgreSQL 俱乐部关系仓储实现

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubnet_common::{AuditInfo, UserId};
use clubnet_errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::club::ClubId;
use crate::domain::connection::{
    Connection, ConnectionId, ConnectionKind, ConnectionRepository,
};

use super::error_mapper::map_sqlx_error;

pub struct PostgresConnectionRepository {
    pool: PgPool,
}

impl PostgresConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONNECTION_COLUMNS: &str = "id, source_club_id, target_club_id, kind, strength, notes, \
     established_year, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl ConnectionRepository for PostgresConnectionRepository {
    async fn create(&self, connection: &Connection) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO connections (id, source_club_id, target_club_id, kind, strength, notes,
                                     established_year, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(connection.id.0)
        .bind(connection.source_club_id.0)
        .bind(connection.target_club_id.0)
        .bind(connection.kind.as_str())
        .bind(connection.strength)
        .bind(&connection.notes)
        .bind(connection.established_year)
        .bind(connection.audit_info.created_at)
        .bind(connection.audit_info.created_by.as_ref().map(|u| u.0))
        .bind(connection.audit_info.updated_at)
        .bind(connection.audit_info.updated_by.as_ref().map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, connection: &Connection) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE connections
            SET kind = $2, strength = $3, notes = $4, established_year = $5,
                updated_at = $6, updated_by = $7
            WHERE id = $1
            "#,
        )
        .bind(connection.id.0)
        .bind(connection.kind.as_str())
        .bind(connection.strength)
        .bind(&connection.notes)
        .bind(connection.established_year)
        .bind(connection.audit_info.updated_at)
        .bind(connection.audit_info.updated_by.as_ref().map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &ConnectionId) -> AppResult<()> {
        sqlx::query("DELETE FROM connections WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ConnectionId) -> AppResult<Option<Connection>> {
        let row = sqlx::query_as::<_, ConnectionRow>(&format!(
            "SELECT {} FROM connections WHERE id = $1",
            CONNECTION_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ConnectionRow::into_connection).transpose()
    }

    async fn exists_between(
        &self,
        a: &ClubId,
        b: &ClubId,
        kind: ConnectionKind,
    ) -> AppResult<bool> {
        // 关系无向：两个方向都算
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM connections
                WHERE kind = $3
                  AND ((source_club_id = $1 AND target_club_id = $2)
                    OR (source_club_id = $2 AND target_club_id = $1))
            )
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn list(&self, page: u32, page_size: u32) -> AppResult<(Vec<Connection>, i64)> {
        let offset = (page.saturating_sub(1)) * page_size;

        let rows = sqlx::query_as::<_, ConnectionRow>(&format!(
            r#"
            SELECT {}
            FROM connections
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            CONNECTION_COLUMNS
        ))
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connections")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let connections = rows
            .into_iter()
            .map(ConnectionRow::into_connection)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((connections, total.0))
    }

    async fn list_by_club(&self, club_id: &ClubId) -> AppResult<Vec<Connection>> {
        let rows = sqlx::query_as::<_, ConnectionRow>(&format!(
            r#"
            SELECT {}
            FROM connections
            WHERE source_club_id = $1 OR target_club_id = $1
            ORDER BY created_at DESC
            "#,
            CONNECTION_COLUMNS
        ))
        .bind(club_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(ConnectionRow::into_connection)
            .collect()
    }

    async fn list_all(&self) -> AppResult<Vec<Connection>> {
        let rows = sqlx::query_as::<_, ConnectionRow>(&format!(
            "SELECT {} FROM connections",
            CONNECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(ConnectionRow::into_connection)
            .collect()
    }

    async fn delete_by_club(&self, club_id: &ClubId) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM connections WHERE source_club_id = $1 OR target_club_id = $1")
                .bind(club_id.0)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn count_by_club(&self, club_id: &ClubId) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM connections WHERE source_club_id = $1 OR target_club_id = $1",
        )
        .bind(club_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connections")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn count_by_kind(&self) -> AppResult<Vec<(ConnectionKind, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT kind, COUNT(*) FROM connections GROUP BY kind ORDER BY kind")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|(kind, count)| {
                ConnectionKind::from_str(&kind)
                    .map(|k| (k, count))
                    .map_err(AppError::database)
            })
            .collect()
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
struct ConnectionRow {
    id: Uuid,
    source_club_id: Uuid,
    target_club_id: Uuid,
    kind: String,
    strength: i16,
    notes: Option<String>,
    established_year: Option<i32>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl ConnectionRow {
    fn into_connection(self) -> AppResult<Connection> {
        let kind = ConnectionKind::from_str(&self.kind).map_err(AppError::database)?;

        Ok(Connection {
            id: ConnectionId::from_uuid(self.id),
            source_club_id: ClubId::from_uuid(self.source_club_id),
            target_club_id: ClubId::from_uuid(self.target_club_id),
            kind,
            strength: self.strength,
            notes: self.notes,
            established_year: self.established_year,
            audit_info: AuditInfo {
                created_at: self.created_at,
                created_by: self.created_by.map(UserId::from_uuid),
                updated_at: self.updated_at,
                updated_by: self.updated_by.map(UserId::from_uuid),
            },
        })
    }
}
