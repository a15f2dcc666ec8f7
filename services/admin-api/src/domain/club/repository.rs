//! 俱乐部仓储接口

use async_trait::async_trait;
use clubnet_errors::AppResult;

use super::club::{Club, ClubId};
use crate::domain::file::FileId;

/// 俱乐部仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// 创建俱乐部
    async fn create(&self, club: &Club) -> AppResult<()>;

    /// 更新俱乐部
    async fn update(&self, club: &Club) -> AppResult<()>;

    /// 删除俱乐部
    async fn delete(&self, id: &ClubId) -> AppResult<()>;

    /// 根据 ID 查找俱乐部
    async fn find_by_id(&self, id: &ClubId) -> AppResult<Option<Club>>;

    /// 根据名称查找俱乐部（大小写不敏感）
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Club>>;

    /// 检查名称是否已存在
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// 分页列出俱乐部
    async fn list(
        &self,
        page: u32,
        page_size: u32,
        include_inactive: bool,
    ) -> AppResult<(Vec<Club>, i64)>;

    /// 搜索俱乐部（名称/国家/城市）
    async fn search(&self, query: &str, page: u32, page_size: u32)
    -> AppResult<(Vec<Club>, i64)>;

    /// 列出所有活跃俱乐部（用于图谱）
    async fn list_active(&self) -> AppResult<Vec<Club>>;

    /// 是否有俱乐部引用该 logo 文件
    async fn exists_with_logo(&self, file_id: &FileId) -> AppResult<bool>;

    /// 统计总数
    async fn count(&self) -> AppResult<i64>;

    /// 统计活跃数量
    async fn count_active(&self) -> AppResult<i64>;
}
