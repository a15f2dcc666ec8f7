//! 路由守卫
//!
//! 守卫只产生决策，不执行跳转；由调用方（HTTP 层）负责重定向

use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_errors::AppResult;

use crate::Claims;

/// 请求的路由元数据
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// 匹配的路由路径
    pub path: String,
    /// 原始 URI（含 query，用于登录后回跳）
    pub original_uri: String,
}

impl RouteContext {
    pub fn new(path: impl Into<String>, original_uri: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_uri: original_uri.into(),
        }
    }
}

/// 拒绝后的跳转目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// 未认证：跳转登录页，携带原始 URL
    Login { intended: String },
    /// 已认证但无权限
    Unauthorized,
}

impl RedirectTarget {
    /// 生成 Location 值
    pub fn location(&self) -> String {
        match self {
            Self::Login { intended } => {
                format!("/auth/login?redirect={}", urlencoding::encode(intended))
            }
            Self::Unauthorized => "/unauthorized".to_string(),
        }
    }
}

/// 守卫决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny { redirect: RedirectTarget },
}

impl GuardDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    fn deny_login(ctx: &RouteContext) -> Self {
        Self::Deny {
            redirect: RedirectTarget::Login {
                intended: ctx.original_uri.clone(),
            },
        }
    }

    fn deny_unauthorized() -> Self {
        Self::Deny {
            redirect: RedirectTarget::Unauthorized,
        }
    }
}

/// 授权协作者：资源/动作级别的访问判定
#[async_trait]
pub trait AccessDecider: Send + Sync {
    async fn can(&self, user_id: &UserId, resource: &str, action: &str) -> AppResult<bool>;
}

/// 路由守卫 trait
#[async_trait]
pub trait RouteGuard: Send + Sync {
    async fn check(&self, claims: Option<&Claims>, ctx: &RouteContext) -> AppResult<GuardDecision>;
}

/// 认证守卫：必须携带有效 access token
pub struct AuthenticationGuard;

#[async_trait]
impl RouteGuard for AuthenticationGuard {
    async fn check(&self, claims: Option<&Claims>, ctx: &RouteContext) -> AppResult<GuardDecision> {
        match claims {
            Some(c) if c.is_access_token() => Ok(GuardDecision::Allow),
            _ => Ok(GuardDecision::deny_login(ctx)),
        }
    }
}

/// 角色守卫：命中列表中任意角色即放行
pub struct RoleGuard {
    any_of: Vec<String>,
}

impl RoleGuard {
    pub fn any_of(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            any_of: roles.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl RouteGuard for RoleGuard {
    async fn check(&self, claims: Option<&Claims>, ctx: &RouteContext) -> AppResult<GuardDecision> {
        let Some(claims) = claims else {
            return Ok(GuardDecision::deny_login(ctx));
        };

        let roles: Vec<&str> = self.any_of.iter().map(String::as_str).collect();
        if claims.has_any_role(&roles) {
            Ok(GuardDecision::Allow)
        } else {
            Ok(GuardDecision::deny_unauthorized())
        }
    }
}

/// 权限匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    AnyOf,
    AllOf,
}

/// 权限守卫
pub struct PermissionGuard {
    required: Vec<String>,
    mode: PermissionMode,
}

impl PermissionGuard {
    pub fn any_of(permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            required: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMode::AnyOf,
        }
    }

    pub fn all_of(permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            required: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMode::AllOf,
        }
    }
}

#[async_trait]
impl RouteGuard for PermissionGuard {
    async fn check(&self, claims: Option<&Claims>, ctx: &RouteContext) -> AppResult<GuardDecision> {
        let Some(claims) = claims else {
            return Ok(GuardDecision::deny_login(ctx));
        };

        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        let satisfied = match self.mode {
            PermissionMode::AnyOf => claims.has_any_permission(&required),
            PermissionMode::AllOf => claims.has_all_permissions(&required),
        };

        if satisfied {
            Ok(GuardDecision::Allow)
        } else {
            Ok(GuardDecision::deny_unauthorized())
        }
    }
}

/// 资源/动作守卫：委托给授权协作者
pub struct ResourceActionGuard {
    resource: String,
    action: String,
    decider: Arc<dyn AccessDecider>,
}

impl ResourceActionGuard {
    pub fn new(
        resource: impl Into<String>,
        action: impl Into<String>,
        decider: Arc<dyn AccessDecider>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            decider,
        }
    }
}

#[async_trait]
impl RouteGuard for ResourceActionGuard {
    async fn check(&self, claims: Option<&Claims>, ctx: &RouteContext) -> AppResult<GuardDecision> {
        let Some(claims) = claims else {
            return Ok(GuardDecision::deny_login(ctx));
        };

        let user_id = claims.user_id()?;
        if self
            .decider
            .can(&user_id, &self.resource, &self.action)
            .await?
        {
            Ok(GuardDecision::Allow)
        } else {
            Ok(GuardDecision::deny_unauthorized())
        }
    }
}

/// 守卫链：按序求值，第一个拒绝即短路
#[derive(Clone, Default)]
pub struct GuardChain {
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, guard: impl RouteGuard + 'static) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn push(&mut self, guard: Arc<dyn RouteGuard>) {
        self.guards.push(guard);
    }

    pub async fn evaluate(
        &self,
        claims: Option<&Claims>,
        ctx: &RouteContext,
    ) -> AppResult<GuardDecision> {
        for guard in &self.guards {
            let decision = guard.check(claims, ctx).await?;
            if !decision.is_allow() {
                return Ok(decision);
            }
        }
        Ok(GuardDecision::Allow)
    }
}
