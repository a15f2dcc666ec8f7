//! 登录失败计数

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_errors::AppResult;

/// 登录失败计数存储
///
/// 连续失败超过阈值后在窗口期内锁定登录
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginAttemptStore: Send + Sync {
    /// 记录一次失败，返回窗口内的累计次数
    async fn record_failure(&self, user_id: &UserId) -> AppResult<i64>;

    /// 是否已锁定
    async fn is_locked(&self, user_id: &UserId) -> AppResult<bool>;

    /// 登录成功后清除计数
    async fn clear(&self, user_id: &UserId) -> AppResult<()>;
}
