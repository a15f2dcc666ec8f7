//! PostgreSQL 文件仓储实现
//!
//! 内容存 bytea；元数据查询不拖出内容列

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubnet_common::UserId;
use clubnet_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::file::{FileId, FileRepository, StoredFile};

use super::error_mapper::map_sqlx_error;

pub struct PostgresFileRepository {
    pool: PgPool,
}

impl PostgresFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn create(&self, file: &StoredFile, content: &[u8]) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO files (id, filename, content_type, size_bytes, sha256, content, uploaded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(file.id.0)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(&file.sha256)
        .bind(content)
        .bind(file.uploaded_by.as_ref().map(|u| u.0))
        .bind(file.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &FileId) -> AppResult<Option<StoredFile>> {
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT id, filename, content_type, size_bytes, sha256, uploaded_by, created_at
            FROM files WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(FileRow::into_file))
    }

    async fn load_content(&self, id: &FileId) -> AppResult<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT content FROM files WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.0))
    }

    async fn delete(&self, id: &FileId) -> AppResult<()> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.0)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
struct FileRow {
    id: Uuid,
    filename: String,
    content_type: String,
    size_bytes: i64,
    sha256: String,
    uploaded_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl FileRow {
    fn into_file(self) -> StoredFile {
        StoredFile {
            id: FileId::from_uuid(self.id),
            filename: self.filename,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            sha256: self.sha256,
            uploaded_by: self.uploaded_by.map(UserId::from_uuid),
            created_at: self.created_at,
        }
    }
}
