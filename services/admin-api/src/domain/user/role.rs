//! 用户角色
//!
//! 全系统唯一的角色定义，角色到权限的映射在此收口

use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Manager,
    Analyst,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Analyst => "Analyst",
            Self::Viewer => "Viewer",
        }
    }

    /// 角色拥有的权限集
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Self::Admin => &[
                "clubs:read",
                "clubs:write",
                "clubs:delete",
                "connections:read",
                "connections:write",
                "users:read",
                "users:manage",
                "files:read",
                "files:write",
                "dashboard:read",
            ],
            Self::Manager => &[
                "clubs:read",
                "clubs:write",
                "connections:read",
                "connections:write",
                "users:read",
                "files:read",
                "files:write",
                "dashboard:read",
            ],
            Self::Analyst => &[
                "clubs:read",
                "connections:read",
                "files:read",
                "dashboard:read",
            ],
            Self::Viewer => &["clubs:read", "connections:read", "dashboard:read"],
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Manager" => Ok(Self::Manager),
            "Analyst" => Ok(Self::Analyst),
            "Viewer" => Ok(Self::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_manage_permission() {
        assert!(UserRole::Admin.has_permission("users:manage"));
        assert!(!UserRole::Manager.has_permission("users:manage"));
        assert!(!UserRole::Viewer.has_permission("clubs:write"));
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Analyst,
            UserRole::Viewer,
        ] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("SuperUser".parse::<UserRole>().is_err());
    }
}
