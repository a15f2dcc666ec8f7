//! 存储文件实体

use chrono::{DateTime, Utc};
use clubnet_common::UserId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 文件 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 文件元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: FileId,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// 内容 SHA-256（hex）
    pub sha256: String,
    pub uploaded_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(
        filename: String,
        content_type: String,
        content: &[u8],
        uploaded_by: Option<UserId>,
    ) -> Self {
        Self {
            id: FileId::new(),
            filename,
            content_type,
            size_bytes: content.len() as i64,
            sha256: Self::checksum(content),
            uploaded_by,
            created_at: Utc::now(),
        }
    }

    /// 计算内容校验和
    pub fn checksum(content: &[u8]) -> String {
        hex::encode(Sha256::digest(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_and_size() {
        let content = b"hello clubnet";
        let file = StoredFile::new(
            "logo.png".to_string(),
            "image/png".to_string(),
            content,
            None,
        );

        assert_eq!(file.size_bytes, content.len() as i64);
        assert_eq!(file.sha256, StoredFile::checksum(content));
        assert_eq!(file.sha256.len(), 64);
    }
}
