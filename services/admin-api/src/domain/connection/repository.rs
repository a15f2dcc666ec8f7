//! 俱乐部关系仓储接口

use async_trait::async_trait;
use clubnet_errors::AppResult;

use super::connection::{Connection, ConnectionId, ConnectionKind};
use crate::domain::club::ClubId;

/// 俱乐部关系仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 创建关系
    async fn create(&self, connection: &Connection) -> AppResult<()>;

    /// 更新关系
    async fn update(&self, connection: &Connection) -> AppResult<()>;

    /// 删除关系
    async fn delete(&self, id: &ConnectionId) -> AppResult<()>;

    /// 根据 ID 查找关系
    async fn find_by_id(&self, id: &ConnectionId) -> AppResult<Option<Connection>>;

    /// 两俱乐部之间是否已存在某类型关系（无向）
    async fn exists_between(
        &self,
        a: &ClubId,
        b: &ClubId,
        kind: ConnectionKind,
    ) -> AppResult<bool>;

    /// 分页列出关系
    async fn list(&self, page: u32, page_size: u32) -> AppResult<(Vec<Connection>, i64)>;

    /// 列出某俱乐部的全部关系
    async fn list_by_club(&self, club_id: &ClubId) -> AppResult<Vec<Connection>>;

    /// 列出全部关系（用于图谱）
    async fn list_all(&self) -> AppResult<Vec<Connection>>;

    /// 删除某俱乐部的全部关系
    async fn delete_by_club(&self, club_id: &ClubId) -> AppResult<u64>;

    /// 某俱乐部的关系数量
    async fn count_by_club(&self, club_id: &ClubId) -> AppResult<i64>;

    /// 统计总数
    async fn count(&self) -> AppResult<i64>;

    /// 按类型统计
    async fn count_by_kind(&self) -> AppResult<Vec<(ConnectionKind, i64)>>;
}
