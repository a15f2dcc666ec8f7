//! 用户值对象

use serde::{Deserialize, Serialize};
use std::fmt;

/// Username 值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl Username {
    /// 创建新的 Username
    pub fn new(username: impl Into<String>) -> Result<Self, UsernameError> {
        let username = username.into();

        Self::validate(&username)?;

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 验证用户名格式
    fn validate(username: &str) -> Result<(), UsernameError> {
        if username.len() < 3 {
            return Err(UsernameError::TooShort);
        }

        if username.len() > 32 {
            return Err(UsernameError::TooLong);
        }

        // 只允许字母、数字、下划线、连字符
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }

        // 必须以字母或数字开头
        if let Some(first_char) = username.chars().next()
            && !first_char.is_alphanumeric()
        {
            return Err(UsernameError::InvalidStart);
        }

        Ok(())
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username 错误
#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum 3 characters)")]
    TooShort,

    #[error("Username is too long (maximum 32 characters)")]
    TooLong,

    #[error("Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)")]
    InvalidCharacters,

    #[error("Username must start with an alphanumeric character")]
    InvalidStart,
}

impl From<UsernameError> for clubnet_errors::AppError {
    fn from(err: UsernameError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Email 值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(pub String);

impl Email {
    /// 创建新的 Email
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into();

        Self::validate(&email)?;

        Ok(Self(email.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 验证邮箱格式（轻量校验，不做完整 RFC 解析）
    fn validate(email: &str) -> Result<(), EmailError> {
        if email.len() > 254 {
            return Err(EmailError::TooLong);
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(EmailError::Invalid);
        };

        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::Invalid);
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::Invalid);
        }

        if email.chars().any(char::is_whitespace) {
            return Err(EmailError::Invalid);
        }

        Ok(())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email 错误
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email address is invalid")]
    Invalid,

    #[error("Email address is too long (maximum 254 characters)")]
    TooLong,
}

impl From<EmailError> for clubnet_errors::AppError {
    fn from(err: EmailError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        let username = Username::new("john_doe");
        assert!(username.is_ok());
        assert_eq!(username.unwrap().0, "john_doe");
    }

    #[test]
    fn test_username_too_short() {
        assert!(matches!(Username::new("ab"), Err(UsernameError::TooShort)));
    }

    #[test]
    fn test_username_too_long() {
        assert!(matches!(
            Username::new("a".repeat(33)),
            Err(UsernameError::TooLong)
        ));
    }

    #[test]
    fn test_username_invalid_characters() {
        assert!(matches!(
            Username::new("john@doe"),
            Err(UsernameError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_username_invalid_start() {
        assert!(matches!(
            Username::new("_johndoe"),
            Err(UsernameError::InvalidStart)
        ));
    }

    #[test]
    fn test_valid_email_is_lowercased() {
        let email = Email::new("Admin@Example.COM").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
    }

    #[test]
    fn test_invalid_emails() {
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("user@nodot").is_err());
        assert!(Email::new("user name@example.com").is_err());
    }
}
