//! 用户管理命令处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use tracing::warn;

use crate::application::auth::UserDto;
use crate::domain::session::SessionRepository;
use crate::domain::user::{
    Email, PasswordService, User, UserRepository, UserRole, UserStatus, Username,
    events::UserEvent,
};

use super::commands::{
    ChangeUserRoleCommand, CreateUserCommand, DeleteUserCommand, ResetUserPasswordCommand,
    SetUserStatusCommand, UpdateUserCommand,
};

/// 用户管理命令处理器
pub struct UserCommandHandler<EP: EventPublisher> {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    event_publisher: Arc<EP>,
}

impl<EP: EventPublisher> UserCommandHandler<EP> {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            event_publisher,
        }
    }

    async fn publish(&self, topic: &str, event: &UserEvent) {
        if let Err(e) = self.event_publisher.publish(topic, event).await {
            warn!(error = %e, topic, "Failed to publish user event");
        }
    }

    async fn load(&self, raw_id: &str) -> AppResult<User> {
        let user_id = UserId::from_string(raw_id)
            .map_err(|_| AppError::validation("Invalid user ID"))?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn parse_role(raw: &str) -> AppResult<UserRole> {
        UserRole::from_str(raw).map_err(AppError::validation)
    }

    /// 不允许移除/降级最后一名活跃管理员
    async fn guard_last_admin(&self, user: &User) -> AppResult<()> {
        if user.is_admin() && self.user_repo.count_by_role(UserRole::Admin).await? <= 1 {
            return Err(AppError::failed_precondition(
                "Cannot remove the last administrator",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<CreateUserCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: CreateUserCommand) -> AppResult<UserDto> {
        command.validate().map_err(AppError::validation)?;

        let username = Username::new(&command.username)?;
        let email = Email::new(&command.email)?;
        let role = Self::parse_role(&command.role)?;
        PasswordService::check_strength(&command.password)?;

        if self.user_repo.exists_by_username(&username).await? {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        if self.user_repo.exists_by_email(email.as_str()).await? {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = PasswordService::hash_password(&command.password)?;
        let mut user = User::new(username, email, password_hash, role);
        user.display_name = command.display_name;
        user.audit_info =
            clubnet_common::AuditInfo::new(command.performed_by.map(UserId::from_uuid));

        self.user_repo.create(&user).await?;

        let event = UserEvent::UserCreated {
            id: user.id.0,
            username: user.username.to_string(),
            role: user.role.to_string(),
            by: command.performed_by,
        };
        self.publish("user.created", &event).await;

        Ok((&user).into())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<UpdateUserCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: UpdateUserCommand) -> AppResult<UserDto> {
        command.validate().map_err(AppError::validation)?;

        let mut user = self.load(&command.user_id).await?;
        let email = Email::new(&command.email)?;

        if user.email != email && self.user_repo.exists_by_email(email.as_str()).await? {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        user.update_profile(email, command.display_name);
        user.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.user_repo.update(&user).await?;

        let event = UserEvent::UserUpdated {
            id: user.id.0,
            by: command.performed_by,
        };
        self.publish("user.updated", &event).await;

        Ok((&user).into())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<ChangeUserRoleCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: ChangeUserRoleCommand) -> AppResult<UserDto> {
        let role = Self::parse_role(&command.role)?;
        let mut user = self.load(&command.user_id).await?;

        if user.role == role {
            return Ok((&user).into());
        }

        // 降级管理员前检查
        if user.is_admin() {
            self.guard_last_admin(&user).await?;
        }

        user.change_role(role);
        user.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.user_repo.update(&user).await?;

        let event = UserEvent::UserUpdated {
            id: user.id.0,
            by: command.performed_by,
        };
        self.publish("user.updated", &event).await;

        Ok((&user).into())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<SetUserStatusCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: SetUserStatusCommand) -> AppResult<UserDto> {
        let status =
            UserStatus::from_str(&command.status).map_err(AppError::validation)?;
        let mut user = self.load(&command.user_id).await?;

        if user.status != status {
            // 停用/锁定管理员前检查
            if status != UserStatus::Active && user.is_admin() {
                self.guard_last_admin(&user).await?;
            }

            user.status = status;
            user.audit_info
                .update(command.performed_by.map(UserId::from_uuid));
            self.user_repo.update(&user).await?;

            // 非活跃用户的会话全部吊销
            if status != UserStatus::Active {
                self.session_repo.revoke_all_for_user(&user.id).await?;
            }

            let event = UserEvent::UserUpdated {
                id: user.id.0,
                by: command.performed_by,
            };
            self.publish("user.updated", &event).await;
        }

        Ok((&user).into())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<ResetUserPasswordCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: ResetUserPasswordCommand) -> AppResult<()> {
        PasswordService::check_strength(&command.new_password)?;

        let mut user = self.load(&command.user_id).await?;

        user.update_password(PasswordService::hash_password(&command.new_password)?);
        user.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.user_repo.update(&user).await?;

        // 密码重置后强制重新登录
        self.session_repo.revoke_all_for_user(&user.id).await?;

        let event = UserEvent::UserUpdated {
            id: user.id.0,
            by: command.performed_by,
        };
        self.publish("user.updated", &event).await;

        Ok(())
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<DeleteUserCommand> for UserCommandHandler<EP> {
    async fn handle(&self, command: DeleteUserCommand) -> AppResult<()> {
        let user = self.load(&command.user_id).await?;

        self.guard_last_admin(&user).await?;

        self.session_repo.revoke_all_for_user(&user.id).await?;
        self.user_repo.delete(&user.id).await?;

        let event = UserEvent::UserDeleted {
            id: user.id.0,
            by: command.performed_by,
        };
        self.publish("user.deleted", &event).await;

        Ok(())
    }
}
