//! 文件命令定义

use clubnet_cqrs_core::Command;
use uuid::Uuid;

use crate::domain::file::StoredFile;

/// 上传文件命令
#[derive(Clone)]
pub struct UploadFileCommand {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
    pub performed_by: Option<Uuid>,
}

impl std::fmt::Debug for UploadFileCommand {
    // 不打印文件内容
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFileCommand")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.content.len())
            .finish()
    }
}

impl UploadFileCommand {
    /// 验证命令参数
    pub fn validate(&self) -> Result<(), String> {
        if self.filename.trim().is_empty() {
            return Err("Filename cannot be empty".to_string());
        }
        if self.filename.len() > 255 {
            return Err("Filename cannot exceed 255 characters".to_string());
        }
        if self.filename.contains('/') || self.filename.contains('\\') {
            return Err("Filename cannot contain path separators".to_string());
        }
        if self.content_type.is_empty() {
            return Err("Content type is required".to_string());
        }
        if self.content.is_empty() {
            return Err("File content cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Command for UploadFileCommand {
    type Result = StoredFile;
}

/// 删除文件命令
#[derive(Debug, Clone)]
pub struct DeleteFileCommand {
    pub file_id: String,
    pub performed_by: Option<Uuid>,
}

impl Command for DeleteFileCommand {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(filename: &str) -> UploadFileCommand {
        UploadFileCommand {
            filename: filename.to_string(),
            content_type: "image/png".to_string(),
            content: vec![1, 2, 3],
            performed_by: None,
        }
    }

    #[test]
    fn test_valid_upload() {
        assert!(cmd("logo.png").validate().is_ok());
    }

    #[test]
    fn test_path_separator_rejected() {
        assert!(cmd("../etc/passwd").validate().is_err());
        assert!(cmd("a\\b.png").validate().is_err());
    }

    #[test]
    fn test_empty_content_rejected() {
        let mut command = cmd("logo.png");
        command.content = Vec::new();
        assert!(command.validate().is_err());
    }
}
