//! 会话仓储接口

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_errors::AppResult;

use super::session::{Session, SessionId};

/// 会话仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 保存会话
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// 更新会话（轮换/吊销）
    async fn update(&self, session: &Session) -> AppResult<()>;

    /// 根据刷新令牌哈希查找会话
    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>>;

    /// 根据 ID 查找会话
    async fn find_by_id(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// 吊销用户的全部会话
    async fn revoke_all_for_user(&self, user_id: &UserId) -> AppResult<u64>;

    /// 清理过期会话
    async fn delete_expired(&self) -> AppResult<u64>;
}
