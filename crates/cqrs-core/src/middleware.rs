//! Middleware 定义

use async_trait::async_trait;
use clubnet_errors::{AppError, AppResult};

/// 请求类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Command,
    Query,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
        }
    }
}

/// 调度中间件 trait
///
/// `before` 返回错误时处理器不会执行
#[async_trait]
pub trait DispatchMiddleware: Send + Sync {
    async fn before(&self, kind: RequestKind, name: &str) -> AppResult<()>;
    async fn after(&self, kind: RequestKind, name: &str, result: Result<(), &AppError>);
}

/// 日志中间件
pub struct LoggingMiddleware;

#[async_trait]
impl DispatchMiddleware for LoggingMiddleware {
    async fn before(&self, kind: RequestKind, name: &str) -> AppResult<()> {
        tracing::debug!(kind = kind.as_str(), request = name, "Dispatching");
        Ok(())
    }

    async fn after(&self, kind: RequestKind, name: &str, result: Result<(), &AppError>) {
        match result {
            Ok(()) => {
                tracing::debug!(kind = kind.as_str(), request = name, "Dispatch succeeded")
            }
            Err(e) => {
                tracing::error!(kind = kind.as_str(), request = name, error = %e, "Dispatch failed")
            }
        }
    }
}
