//! 基于角色的资源/动作判定

use std::sync::Arc;

use async_trait::async_trait;
use clubnet_auth_core::guard::AccessDecider;
use clubnet_common::UserId;
use clubnet_errors::AppResult;

use crate::domain::user::UserRepository;

/// 以用户当前角色为准的访问判定
///
/// 读取数据库而非 token，角色变更即时生效
pub struct RbacAccessDecider {
    user_repo: Arc<dyn UserRepository>,
}

impl RbacAccessDecider {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl AccessDecider for RbacAccessDecider {
    async fn can(&self, user_id: &UserId, resource: &str, action: &str) -> AppResult<bool> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(false);
        };

        if !user.is_active() {
            return Ok(false);
        }

        let permission = format!("{}:{}", resource, action);
        Ok(user.role.has_permission(&permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Email, MockUserRepository, User, UserRole, Username};

    fn user(role: UserRole) -> User {
        User::new(
            Username::new("someone").unwrap(),
            Email::new("someone@example.com").unwrap(),
            "$argon2id$fake".to_string(),
            role,
        )
    }

    #[tokio::test]
    async fn test_role_permissions_decide_access() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(user(UserRole::Analyst))));

        let decider = RbacAccessDecider::new(Arc::new(repo));
        let id = UserId::new();

        assert!(decider.can(&id, "clubs", "read").await.unwrap());
        assert!(!decider.can(&id, "clubs", "write").await.unwrap());
    }

    #[tokio::test]
    async fn test_inactive_user_denied() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| {
            let mut u = user(UserRole::Admin);
            u.deactivate();
            Ok(Some(u))
        });

        let decider = RbacAccessDecider::new(Arc::new(repo));
        assert!(!decider.can(&UserId::new(), "clubs", "read").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_denied() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let decider = RbacAccessDecider::new(Arc::new(repo));
        assert!(!decider.can(&UserId::new(), "clubs", "read").await.unwrap());
    }
}
