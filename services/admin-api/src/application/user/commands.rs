//! 用户管理命令定义

use clubnet_cqrs_core::Command;
use uuid::Uuid;

use crate::application::auth::UserDto;

/// 创建用户命令
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: String,
    pub performed_by: Option<Uuid>,
}

impl CreateUserCommand {
    /// 验证命令参数
    ///
    /// 用户名/邮箱/密码的格式校验在各自的值对象与 PasswordService 中完成
    pub fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if self.email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Err("Password cannot be empty".to_string());
        }
        if self.role.is_empty() {
            return Err("Role cannot be empty".to_string());
        }
        if let Some(name) = self.display_name.as_deref()
            && name.len() > 100
        {
            return Err("Display name cannot exceed 100 characters".to_string());
        }
        Ok(())
    }
}

impl Command for CreateUserCommand {
    type Result = UserDto;
}

/// 更新用户资料命令
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub performed_by: Option<Uuid>,
}

impl UpdateUserCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }
        if let Some(name) = self.display_name.as_deref()
            && name.len() > 100
        {
            return Err("Display name cannot exceed 100 characters".to_string());
        }
        Ok(())
    }
}

impl Command for UpdateUserCommand {
    type Result = UserDto;
}

/// 变更用户角色命令
#[derive(Debug, Clone)]
pub struct ChangeUserRoleCommand {
    pub user_id: String,
    pub role: String,
    pub performed_by: Option<Uuid>,
}

impl Command for ChangeUserRoleCommand {
    type Result = UserDto;
}

/// 设置用户状态命令
#[derive(Debug, Clone)]
pub struct SetUserStatusCommand {
    pub user_id: String,
    pub status: String,
    pub performed_by: Option<Uuid>,
}

impl Command for SetUserStatusCommand {
    type Result = UserDto;
}

/// 重置用户密码命令
#[derive(Debug, Clone)]
pub struct ResetUserPasswordCommand {
    pub user_id: String,
    pub new_password: String,
    pub performed_by: Option<Uuid>,
}

impl Command for ResetUserPasswordCommand {
    type Result = ();
}

/// 删除用户命令
#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub user_id: String,
    pub performed_by: Option<Uuid>,
}

impl Command for DeleteUserCommand {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let cmd = CreateUserCommand {
            username: "scout42".to_string(),
            email: "scout@example.com".to_string(),
            password: "long enough".to_string(),
            display_name: None,
            role: "Analyst".to_string(),
            performed_by: None,
        };
        assert!(cmd.validate().is_ok());

        let mut bad = cmd.clone();
        bad.password = String::new();
        assert!(bad.validate().is_err());

        let mut bad = cmd;
        bad.display_name = Some("x".repeat(101));
        assert!(bad.validate().is_err());
    }
}
