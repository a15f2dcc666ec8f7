//! 认证命令定义

use clubnet_cqrs_core::Command;

use super::dto::{TokenPair, UserDto};

/// 登录命令
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl LoginCommand {
    /// 验证命令参数
    pub fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Err("Password cannot be empty".to_string());
        }
        Ok(())
    }
}

/// 登录结果
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub tokens: TokenPair,
    pub user: UserDto,
}

impl Command for LoginCommand {
    type Result = LoginResult;
}

/// 刷新令牌命令
#[derive(Debug, Clone)]
pub struct RefreshTokenCommand {
    pub refresh_token: String,
}

impl RefreshTokenCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_token.is_empty() {
            return Err("Refresh token cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Command for RefreshTokenCommand {
    type Result = TokenPair;
}

/// 登出命令（吊销会话）
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub refresh_token: String,
}

impl Command for LogoutCommand {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_command_validation() {
        let cmd = LoginCommand {
            username: String::new(),
            password: "secret123".to_string(),
            ip_address: None,
            user_agent: None,
        };
        assert!(cmd.validate().is_err());

        let cmd = LoginCommand {
            username: "admin".to_string(),
            password: String::new(),
            ip_address: None,
            user_agent: None,
        };
        assert!(cmd.validate().is_err());

        let cmd = LoginCommand {
            username: "admin".to_string(),
            password: "secret123".to_string(),
            ip_address: None,
            user_agent: None,
        };
        assert!(cmd.validate().is_ok());
    }
}
