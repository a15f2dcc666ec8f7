//! 认证命令处理器

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use clubnet_auth_core::TokenService;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use tracing::warn;

use crate::domain::session::{Session, SessionRepository};
use crate::domain::user::{
    LoginAttemptStore, PasswordService, User, UserRepository, Username, events::UserEvent,
};

use super::commands::{LoginCommand, LoginResult, LogoutCommand, RefreshTokenCommand};
use super::dto::TokenPair;

/// 连续失败锁定阈值
const MAX_FAILED_ATTEMPTS: i64 = 5;

/// 认证命令处理器
pub struct AuthCommandHandler<EP: EventPublisher> {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    attempts: Arc<dyn LoginAttemptStore>,
    token_service: Arc<TokenService>,
    event_publisher: Arc<EP>,
}

impl<EP: EventPublisher> AuthCommandHandler<EP> {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        attempts: Arc<dyn LoginAttemptStore>,
        token_service: Arc<TokenService>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            attempts,
            token_service,
            event_publisher,
        }
    }

    fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let permissions = user
            .role
            .permissions()
            .iter()
            .map(|p| p.to_string())
            .collect();
        let roles = vec![user.role.to_string()];

        let access_token = self
            .token_service
            .generate_access_token(&user.id, permissions, roles)?;
        let refresh_token = self.token_service.generate_refresh_token(&user.id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_expires_in(),
            token_type: "Bearer".to_string(),
        })
    }

    fn refresh_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::seconds(self.token_service.refresh_token_expires_in())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<LoginCommand> for AuthCommandHandler<EP> {
    async fn handle(&self, command: LoginCommand) -> AppResult<LoginResult> {
        command.validate().map_err(AppError::validation)?;

        // 用户名格式不合法时与未知用户同样返回凭证错误，避免账号枚举
        let Ok(username) = Username::new(&command.username) else {
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        let mut user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if self.attempts.is_locked(&user.id).await? {
            return Err(AppError::forbidden(
                "Account is locked due to too many failed attempts",
            ));
        }

        let valid = PasswordService::verify_password(&command.password, &user.password_hash)?;
        if !valid {
            metrics::counter!("auth_logins_total", "result" => "failure").increment(1);
            let failures = self.attempts.record_failure(&user.id).await?;
            if failures >= MAX_FAILED_ATTEMPTS {
                warn!(
                    user_id = %user.id,
                    failures,
                    ip = command.ip_address.as_deref().unwrap_or("unknown"),
                    "Login temporarily locked"
                );
            }
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        if !user.is_active() {
            return Err(AppError::forbidden("User account is not active"));
        }

        let tokens = self.issue_tokens(&user)?;

        let session = Session::new(
            user.id.clone(),
            Session::hash_token(&tokens.refresh_token),
            self.refresh_expiry(),
        );
        self.session_repo.save(&session).await?;

        user.record_login();
        self.user_repo.update(&user).await?;
        self.attempts.clear(&user.id).await?;

        let event = UserEvent::UserLoggedIn {
            id: user.id.0,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.event_publisher.publish("user.logged_in", &event).await {
            warn!(error = %e, "Failed to publish login event");
        }
        metrics::counter!("auth_logins_total", "result" => "success").increment(1);

        Ok(LoginResult {
            user: (&user).into(),
            tokens,
        })
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<RefreshTokenCommand> for AuthCommandHandler<EP> {
    async fn handle(&self, command: RefreshTokenCommand) -> AppResult<TokenPair> {
        command.validate().map_err(AppError::validation)?;

        let claims = self
            .token_service
            .validate_refresh_token(&command.refresh_token)?;
        let user_id = claims.user_id()?;

        let token_hash = Session::hash_token(&command.refresh_token);
        let mut session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown refresh token"))?;

        if !session.is_live() || session.user_id != user_id {
            return Err(AppError::unauthorized("Refresh token is no longer valid"));
        }

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        if !user.is_active() {
            return Err(AppError::forbidden("User account is not active"));
        }

        let tokens = self.issue_tokens(&user)?;

        // 轮换：旧刷新令牌立即失效
        session.rotate(Session::hash_token(&tokens.refresh_token), self.refresh_expiry());
        self.session_repo.update(&session).await?;

        Ok(tokens)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<LogoutCommand> for AuthCommandHandler<EP> {
    async fn handle(&self, command: LogoutCommand) -> AppResult<()> {
        let token_hash = Session::hash_token(&command.refresh_token);

        // 登出幂等：未知令牌也返回成功
        if let Some(mut session) = self.session_repo.find_by_token_hash(&token_hash).await? {
            if !session.is_revoked() {
                session.revoke();
                self.session_repo.update(&session).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::MockSessionRepository;
    use crate::domain::user::{
        Email, MockLoginAttemptStore, MockUserRepository, UserRole, Username,
    };
    use clubnet_ports::EventPublisher;
    use serde::Serialize;

    struct NoopPublisher;

    #[async_trait]
    impl EventPublisher for NoopPublisher {
        async fn publish<E: Serialize + Send + Sync>(
            &self,
            _topic: &str,
            _event: &E,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn publish_raw(&self, _topic: &str, _payload: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            "test-secret",
            3600,
            604800,
            "iss".to_string(),
            "aud".to_string(),
        ))
    }

    fn test_user(password: &str) -> User {
        User::new(
            Username::new("admin1").unwrap(),
            Email::new("admin@example.com").unwrap(),
            PasswordService::hash_password(password).unwrap(),
            UserRole::Admin,
        )
    }

    fn handler(
        user_repo: MockUserRepository,
        session_repo: MockSessionRepository,
        attempts: MockLoginAttemptStore,
    ) -> AuthCommandHandler<NoopPublisher> {
        AuthCommandHandler::new(
            Arc::new(user_repo),
            Arc::new(session_repo),
            Arc::new(attempts),
            token_service(),
            Arc::new(NoopPublisher),
        )
    }

    #[tokio::test]
    async fn test_login_validation_failure_runs_no_repository_calls() {
        // 空用户名：任何仓储方法都不应被调用
        let handler = handler(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockLoginAttemptStore::new(),
        );

        let err = handler
            .handle(LoginCommand {
                username: String::new(),
                password: "secret123".to_string(),
                ip_address: None,
                user_agent: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let handler = handler(
            user_repo,
            MockSessionRepository::new(),
            MockLoginAttemptStore::new(),
        );

        let err = handler
            .handle(LoginCommand {
                username: "ghost".to_string(),
                password: "whatever1".to_string(),
                ip_address: None,
                user_agent: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_records_failure() {
        let user = test_user("right-password");
        let mut user_repo = MockUserRepository::new();
        let stored = user.clone();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut attempts = MockLoginAttemptStore::new();
        attempts.expect_is_locked().returning(|_| Ok(false));
        attempts
            .expect_record_failure()
            .times(1)
            .returning(|_| Ok(1));

        let handler = handler(user_repo, MockSessionRepository::new(), attempts);

        let err = handler
            .handle(LoginCommand {
                username: "admin1".to_string(),
                password: "wrong-password".to_string(),
                ip_address: None,
                user_agent: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_locked_account_is_forbidden() {
        let user = test_user("right-password");
        let mut user_repo = MockUserRepository::new();
        let stored = user.clone();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut attempts = MockLoginAttemptStore::new();
        attempts.expect_is_locked().returning(|_| Ok(true));

        let handler = handler(user_repo, MockSessionRepository::new(), attempts);

        let err = handler
            .handle(LoginCommand {
                username: "admin1".to_string(),
                password: "right-password".to_string(),
                ip_address: None,
                user_agent: None,
            })
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_login_success_creates_session_and_tokens() {
        let user = test_user("right-password");
        let mut user_repo = MockUserRepository::new();
        let stored = user.clone();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));
        user_repo.expect_update().times(1).returning(|_| Ok(()));

        let mut session_repo = MockSessionRepository::new();
        session_repo.expect_save().times(1).returning(|_| Ok(()));

        let mut attempts = MockLoginAttemptStore::new();
        attempts.expect_is_locked().returning(|_| Ok(false));
        attempts.expect_clear().times(1).returning(|_| Ok(()));

        let handler = handler(user_repo, session_repo, attempts);

        let result = handler
            .handle(LoginCommand {
                username: "admin1".to_string(),
                password: "right-password".to_string(),
                ip_address: Some("127.0.0.1".to_string()),
                user_agent: None,
            })
            .await
            .unwrap();

        assert_eq!(result.tokens.token_type, "Bearer");
        assert_eq!(result.user.username, "admin1");
        assert!(!result.tokens.access_token.is_empty());
        assert!(!result.tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_for_unknown_token() {
        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_find_by_token_hash()
            .returning(|_| Ok(None));

        let handler = handler(
            MockUserRepository::new(),
            session_repo,
            MockLoginAttemptStore::new(),
        );

        handler
            .handle(LogoutCommand {
                refresh_token: "unknown".to_string(),
            })
            .await
            .unwrap();
    }
}
