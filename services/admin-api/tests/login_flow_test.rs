//! 登录/刷新/登出全流程测试（进程内假仓储）

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clubnet_auth_core::TokenService;
use clubnet_common::UserId;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use serde::Serialize;

use admin_api::application::auth::{
    AuthCommandHandler, LoginCommand, LogoutCommand, RefreshTokenCommand,
};
use admin_api::domain::session::{Session, SessionId, SessionRepository};
use admin_api::domain::user::{
    Email, LoginAttemptStore, PasswordService, User, UserRepository, UserRole, Username,
};

struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish<E: Serialize + Send + Sync>(&self, _topic: &str, _event: &E) -> AppResult<()> {
        Ok(())
    }

    async fn publish_raw(&self, _topic: &str, _payload: &str) -> AppResult<()> {
        Ok(())
    }
}

/// 进程内用户仓储
#[derive(Default)]
struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    fn with_user(user: User) -> Self {
        let repo = Self::default();
        repo.users
            .lock()
            .unwrap()
            .insert(user.username.to_string(), user);
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.username.to_string(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.username.to_string(), user.clone());
        Ok(())
    }

    async fn delete(&self, _id: &UserId) -> AppResult<()> {
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> AppResult<bool> {
        Ok(self.users.lock().unwrap().contains_key(username.as_str()))
    }

    async fn exists_by_email(&self, _email: &str) -> AppResult<bool> {
        Ok(false)
    }

    async fn list(&self, _page: u32, _page_size: u32) -> AppResult<(Vec<User>, i64)> {
        let users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        let total = users.len() as i64;
        Ok((users, total))
    }

    async fn search(
        &self,
        _query: &str,
        _page: u32,
        _page_size: u32,
    ) -> AppResult<(Vec<User>, i64)> {
        Ok((vec![], 0))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn count_active(&self) -> AppResult<i64> {
        self.count().await
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<i64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .count() as i64)
    }
}

/// 进程内会话仓储（按刷新令牌哈希索引）
#[derive(Default)]
struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> AppResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.to_string(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> AppResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.to_string(), session.clone());
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.refresh_token_hash == token_hash)
            .cloned())
    }

    async fn find_by_id(&self, id: &SessionId) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(&id.to_string()).cloned())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let mut revoked = 0;
        for session in sessions.values_mut() {
            if &session.user_id == user_id && !session.is_revoked() {
                session.revoke();
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        Ok(0)
    }
}

/// 永不锁定的计数替身
#[derive(Default)]
struct NoLockout;

#[async_trait]
impl LoginAttemptStore for NoLockout {
    async fn record_failure(&self, _user_id: &UserId) -> AppResult<i64> {
        Ok(1)
    }

    async fn is_locked(&self, _user_id: &UserId) -> AppResult<bool> {
        Ok(false)
    }

    async fn clear(&self, _user_id: &UserId) -> AppResult<()> {
        Ok(())
    }
}

fn setup() -> (
    AuthCommandHandler<NoopPublisher>,
    Arc<TokenService>,
) {
    let user = User::new(
        Username::new("admin1").unwrap(),
        Email::new("admin@example.com").unwrap(),
        PasswordService::hash_password("correct horse battery").unwrap(),
        UserRole::Admin,
    );

    let token_service = Arc::new(TokenService::new(
        "integration-secret",
        3600,
        604800,
        "clubnet-admin".to_string(),
        "clubnet-api".to_string(),
    ));

    let handler = AuthCommandHandler::new(
        Arc::new(InMemoryUserRepository::with_user(user)),
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(NoLockout),
        token_service.clone(),
        Arc::new(NoopPublisher),
    );

    (handler, token_service)
}

fn login_cmd(password: &str) -> LoginCommand {
    LoginCommand {
        username: "admin1".to_string(),
        password: password.to_string(),
        ip_address: None,
        user_agent: Some("integration-test".to_string()),
    }
}

#[tokio::test]
async fn login_issues_valid_token_pair() {
    let (handler, token_service) = setup();

    let result = handler.handle(login_cmd("correct horse battery")).await.unwrap();

    let claims = token_service
        .validate_access_token(&result.tokens.access_token)
        .unwrap();
    assert!(claims.has_role("Admin"));
    assert!(claims.has_permission("users:manage"));

    assert!(
        token_service
            .validate_refresh_token(&result.tokens.refresh_token)
            .is_ok()
    );
    assert!(result.user.last_login_at.is_some());
}

#[tokio::test]
async fn refresh_rotates_and_invalidates_old_token() {
    let (handler, _) = setup();

    let login = handler.handle(login_cmd("correct horse battery")).await.unwrap();
    let old_refresh = login.tokens.refresh_token.clone();

    let rotated = handler
        .handle(RefreshTokenCommand {
            refresh_token: old_refresh.clone(),
        })
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, old_refresh);

    // 旧刷新令牌已被轮换，不能再次使用
    let err = handler
        .handle(RefreshTokenCommand {
            refresh_token: old_refresh,
        })
        .await
        .err()
        .unwrap();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn logout_revokes_session_for_refresh() {
    let (handler, _) = setup();

    let login = handler.handle(login_cmd("correct horse battery")).await.unwrap();
    let refresh_token = login.tokens.refresh_token.clone();

    handler
        .handle(LogoutCommand {
            refresh_token: refresh_token.clone(),
        })
        .await
        .unwrap();

    let err = handler
        .handle(RefreshTokenCommand { refresh_token })
        .await
        .err()
        .unwrap();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (handler, _) = setup();

    let err = handler.handle(login_cmd("wrong password")).await.err().unwrap();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
