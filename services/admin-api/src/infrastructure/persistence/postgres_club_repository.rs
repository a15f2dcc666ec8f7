//! PostgreSQL 俱乐部仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubnet_common::{AuditInfo, UserId};
use clubnet_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::club::{Club, ClubId, ClubRepository};
use crate::domain::file::FileId;

use super::error_mapper::map_sqlx_error;

pub struct PostgresClubRepository {
    pool: PgPool,
}

impl PostgresClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CLUB_COLUMNS: &str = "id, name, short_name, country, city, founded_year, stadium, website, \
     logo_file_id, is_active, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl ClubRepository for PostgresClubRepository {
    async fn create(&self, club: &Club) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clubs (id, name, short_name, country, city, founded_year, stadium, website,
                               logo_file_id, is_active, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(club.id.0)
        .bind(&club.name)
        .bind(&club.short_name)
        .bind(&club.country)
        .bind(&club.city)
        .bind(club.founded_year)
        .bind(&club.stadium)
        .bind(&club.website)
        .bind(club.logo_file_id.as_ref().map(|f| f.0))
        .bind(club.is_active)
        .bind(club.audit_info.created_at)
        .bind(club.audit_info.created_by.as_ref().map(|u| u.0))
        .bind(club.audit_info.updated_at)
        .bind(club.audit_info.updated_by.as_ref().map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, club: &Club) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE clubs
            SET name = $2, short_name = $3, country = $4, city = $5, founded_year = $6,
                stadium = $7, website = $8, logo_file_id = $9, is_active = $10,
                updated_at = $11, updated_by = $12
            WHERE id = $1
            "#,
        )
        .bind(club.id.0)
        .bind(&club.name)
        .bind(&club.short_name)
        .bind(&club.country)
        .bind(&club.city)
        .bind(club.founded_year)
        .bind(&club.stadium)
        .bind(&club.website)
        .bind(club.logo_file_id.as_ref().map(|f| f.0))
        .bind(club.is_active)
        .bind(club.audit_info.updated_at)
        .bind(club.audit_info.updated_by.as_ref().map(|u| u.0))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &ClubId) -> AppResult<()> {
        sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ClubId) -> AppResult<Option<Club>> {
        let row = sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {} FROM clubs WHERE id = $1",
            CLUB_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ClubRow::into_club))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Club>> {
        let row = sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {} FROM clubs WHERE LOWER(name) = LOWER($1)",
            CLUB_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ClubRow::into_club))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clubs WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn list(
        &self,
        page: u32,
        page_size: u32,
        include_inactive: bool,
    ) -> AppResult<(Vec<Club>, i64)> {
        let offset = (page.saturating_sub(1)) * page_size;

        let rows = sqlx::query_as::<_, ClubRow>(&format!(
            r#"
            SELECT {}
            FROM clubs
            WHERE ($1 OR is_active)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
            CLUB_COLUMNS
        ))
        .bind(include_inactive)
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clubs WHERE ($1 OR is_active)")
            .bind(include_inactive)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok((rows.into_iter().map(ClubRow::into_club).collect(), total.0))
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> AppResult<(Vec<Club>, i64)> {
        let offset = (page.saturating_sub(1)) * page_size;
        let search_pattern = format!("%{}%", query);

        let rows = sqlx::query_as::<_, ClubRow>(&format!(
            r#"
            SELECT {}
            FROM clubs
            WHERE name ILIKE $1 OR country ILIKE $1 OR city ILIKE $1
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
            CLUB_COLUMNS
        ))
        .bind(&search_pattern)
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM clubs WHERE name ILIKE $1 OR country ILIKE $1 OR city ILIKE $1",
        )
        .bind(&search_pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((rows.into_iter().map(ClubRow::into_club).collect(), total.0))
    }

    async fn list_active(&self) -> AppResult<Vec<Club>> {
        let rows = sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {} FROM clubs WHERE is_active ORDER BY name ASC",
            CLUB_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ClubRow::into_club).collect())
    }

    async fn exists_with_logo(&self, file_id: &FileId) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clubs WHERE logo_file_id = $1)")
                .bind(file_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clubs")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.0)
    }

    async fn count_active(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clubs WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.0)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
struct ClubRow {
    id: Uuid,
    name: String,
    short_name: Option<String>,
    country: String,
    city: Option<String>,
    founded_year: Option<i32>,
    stadium: Option<String>,
    website: Option<String>,
    logo_file_id: Option<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl ClubRow {
    fn into_club(self) -> Club {
        Club {
            id: ClubId::from_uuid(self.id),
            name: self.name,
            short_name: self.short_name,
            country: self.country,
            city: self.city,
            founded_year: self.founded_year,
            stadium: self.stadium,
            website: self.website,
            logo_file_id: self.logo_file_id.map(FileId::from_uuid),
            is_active: self.is_active,
            audit_info: AuditInfo {
                created_at: self.created_at,
                created_by: self.created_by.map(UserId::from_uuid),
                updated_at: self.updated_at,
                updated_by: self.updated_by.map(UserId::from_uuid),
            },
        }
    }
}
