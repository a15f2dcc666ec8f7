//! 文件查询处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::{AppError, AppResult};

use crate::domain::file::{FileId, FileRepository, StoredFile};

use super::queries::{FileDownload, GetFileContentQuery, GetFileQuery};

/// 文件查询处理器
pub struct FileQueryHandler {
    file_repo: Arc<dyn FileRepository>,
}

impl FileQueryHandler {
    pub fn new(file_repo: Arc<dyn FileRepository>) -> Self {
        Self { file_repo }
    }

    fn parse_id(raw: &str) -> AppResult<FileId> {
        FileId::from_str(raw).map_err(|_| AppError::validation("Invalid file ID"))
    }
}

#[async_trait]
impl QueryHandler<GetFileQuery> for FileQueryHandler {
    async fn handle(&self, query: GetFileQuery) -> AppResult<StoredFile> {
        let file_id = Self::parse_id(&query.file_id)?;

        self.file_repo
            .find_by_id(&file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}

#[async_trait]
impl QueryHandler<GetFileContentQuery> for FileQueryHandler {
    async fn handle(&self, query: GetFileContentQuery) -> AppResult<FileDownload> {
        let file_id = Self::parse_id(&query.file_id)?;

        let meta = self
            .file_repo
            .find_by_id(&file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let content = self
            .file_repo
            .load_content(&file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File content not found"))?;

        Ok(FileDownload { meta, content })
    }
}
