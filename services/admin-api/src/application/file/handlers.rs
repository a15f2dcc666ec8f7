//! 文件命令处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};

use crate::domain::club::ClubRepository;
use crate::domain::file::{FileId, FileRepository, StoredFile};

use super::commands::{DeleteFileCommand, UploadFileCommand};

/// 文件命令处理器
pub struct FileCommandHandler {
    file_repo: Arc<dyn FileRepository>,
    club_repo: Arc<dyn ClubRepository>,
    max_file_bytes: usize,
}

impl FileCommandHandler {
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        club_repo: Arc<dyn ClubRepository>,
        max_file_bytes: usize,
    ) -> Self {
        Self {
            file_repo,
            club_repo,
            max_file_bytes,
        }
    }
}

#[async_trait]
impl CommandHandler<UploadFileCommand> for FileCommandHandler {
    async fn handle(&self, command: UploadFileCommand) -> AppResult<StoredFile> {
        command.validate().map_err(AppError::validation)?;

        if command.content.len() > self.max_file_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum size of {} bytes",
                self.max_file_bytes
            )));
        }

        let file = StoredFile::new(
            command.filename,
            command.content_type,
            &command.content,
            command.performed_by.map(UserId::from_uuid),
        );

        self.file_repo.create(&file, &command.content).await?;

        Ok(file)
    }
}

#[async_trait]
impl CommandHandler<DeleteFileCommand> for FileCommandHandler {
    async fn handle(&self, command: DeleteFileCommand) -> AppResult<()> {
        let file_id = FileId::from_str(&command.file_id)
            .map_err(|_| AppError::validation("Invalid file ID"))?;

        if self.file_repo.find_by_id(&file_id).await?.is_none() {
            return Err(AppError::not_found("File not found"));
        }

        // logo 仍被引用时拒绝删除
        if self.club_repo.exists_with_logo(&file_id).await? {
            return Err(AppError::failed_precondition(
                "File is still referenced as a club logo",
            ));
        }

        self.file_repo.delete(&file_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::club::MockClubRepository;
    use crate::domain::file::MockFileRepository;

    #[tokio::test]
    async fn test_oversized_upload_rejected_before_persist() {
        let handler = FileCommandHandler::new(
            Arc::new(MockFileRepository::new()),
            Arc::new(MockClubRepository::new()),
            4,
        );

        let err = handler
            .handle(UploadFileCommand {
                filename: "logo.png".to_string(),
                content_type: "image/png".to_string(),
                content: vec![0; 5],
                performed_by: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upload_computes_checksum() {
        let mut file_repo = MockFileRepository::new();
        file_repo.expect_create().times(1).returning(|_, _| Ok(()));

        let handler = FileCommandHandler::new(
            Arc::new(file_repo),
            Arc::new(MockClubRepository::new()),
            1024,
        );

        let file = handler
            .handle(UploadFileCommand {
                filename: "logo.png".to_string(),
                content_type: "image/png".to_string(),
                content: b"png-bytes".to_vec(),
                performed_by: None,
            })
            .await
            .unwrap();

        assert_eq!(file.size_bytes, 9);
        assert_eq!(file.sha256, StoredFile::checksum(b"png-bytes"));
    }

    #[tokio::test]
    async fn test_delete_referenced_logo_refused() {
        let file = StoredFile::new(
            "logo.png".to_string(),
            "image/png".to_string(),
            b"x",
            None,
        );
        let file_id = file.id.clone();

        let mut file_repo = MockFileRepository::new();
        let stored = file.clone();
        file_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut club_repo = MockClubRepository::new();
        club_repo.expect_exists_with_logo().returning(|_| Ok(true));

        let handler = FileCommandHandler::new(Arc::new(file_repo), Arc::new(club_repo), 1024);

        let err = handler
            .handle(DeleteFileCommand {
                file_id: file_id.to_string(),
                performed_by: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::FailedPrecondition(_)));
    }
}
