//! 用户仓储接口

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_errors::AppResult;

use super::role::UserRole;
use super::user::User;
use super::value_objects::Username;

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户
    async fn create(&self, user: &User) -> AppResult<()>;

    /// 更新用户
    async fn update(&self, user: &User) -> AppResult<()>;

    /// 删除用户
    async fn delete(&self, id: &UserId) -> AppResult<()>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &Username) -> AppResult<Option<User>>;

    /// 检查用户名是否已存在
    async fn exists_by_username(&self, username: &Username) -> AppResult<bool>;

    /// 检查邮箱是否已存在
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// 分页列出用户
    async fn list(&self, page: u32, page_size: u32) -> AppResult<(Vec<User>, i64)>;

    /// 搜索用户（用户名/邮箱/显示名）
    async fn search(&self, query: &str, page: u32, page_size: u32)
    -> AppResult<(Vec<User>, i64)>;

    /// 统计总数
    async fn count(&self) -> AppResult<i64>;

    /// 统计活跃数量
    async fn count_active(&self) -> AppResult<i64>;

    /// 统计某角色的活跃用户数
    async fn count_by_role(&self, role: UserRole) -> AppResult<i64>;
}
