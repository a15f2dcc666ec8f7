//! 文件仓储接口

use async_trait::async_trait;
use clubnet_errors::AppResult;

use super::stored_file::{FileId, StoredFile};

/// 文件仓储接口
///
/// 元数据与内容分开读取，避免列表查询拖出 bytea
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// 保存文件（元数据 + 内容）
    async fn create(&self, file: &StoredFile, content: &[u8]) -> AppResult<()>;

    /// 读取元数据
    async fn find_by_id(&self, id: &FileId) -> AppResult<Option<StoredFile>>;

    /// 读取内容
    async fn load_content(&self, id: &FileId) -> AppResult<Option<Vec<u8>>>;

    /// 删除文件
    async fn delete(&self, id: &FileId) -> AppResult<()>;

    /// 统计总数
    async fn count(&self) -> AppResult<i64>;
}
