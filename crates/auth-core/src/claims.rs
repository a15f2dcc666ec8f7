//! JWT Claims

use chrono::{Duration, Utc};
use clubnet_common::UserId;
use clubnet_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
    /// Permissions
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Roles
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: &UserId,
        permissions: Vec<String>,
        roles: Vec<String>,
        expires_in_secs: i64,
        token_type: &str,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.0.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: token_type.to_string(),
            permissions,
            roles,
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }

    /// 验证 token 类型
    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }

    /// 验证 token 类型
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == "refresh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with(roles: Vec<&str>, permissions: Vec<&str>) -> Claims {
        Claims::new(
            &UserId::new(),
            permissions.into_iter().map(String::from).collect(),
            roles.into_iter().map(String::from).collect(),
            3600,
            "access",
            "iss",
            "aud",
        )
    }

    #[test]
    fn test_role_and_permission_checks() {
        let claims = claims_with(vec!["Admin"], vec!["clubs:write", "clubs:read"]);

        assert!(claims.has_role("Admin"));
        assert!(!claims.has_role("Viewer"));
        assert!(claims.has_any_role(&["Viewer", "Admin"]));
        assert!(claims.has_any_permission(&["users:manage", "clubs:write"]));
        assert!(claims.has_all_permissions(&["clubs:write", "clubs:read"]));
        assert!(!claims.has_all_permissions(&["clubs:write", "users:manage"]));
    }

    #[test]
    fn test_user_id_parse() {
        let user_id = UserId::new();
        let claims = Claims::new(&user_id, vec![], vec![], 60, "access", "iss", "aud");
        assert_eq!(claims.user_id().unwrap(), user_id);

        let mut bad = claims;
        bad.sub = "not-a-uuid".to_string();
        assert!(bad.user_id().is_err());
    }
}
