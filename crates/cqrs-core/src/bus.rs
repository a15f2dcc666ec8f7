//! Command/Query Bus
//!
//! 显式注册表：TypeId -> handler，启动期注册，运行期只读

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_errors::{AppError, AppResult};

use crate::{Command, CommandHandler, DispatchMiddleware, Query, QueryHandler, RequestKind};

/// Command Bus trait
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn dispatch<C: Command + 'static>(&self, command: C) -> AppResult<C::Result>;
}

/// Query Bus trait
#[async_trait]
pub trait QueryBus: Send + Sync {
    async fn dispatch<Q: Query + 'static>(&self, query: Q) -> AppResult<Q::Result>;
}

type HandlerMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Command Bus 构建器
///
/// 每个 command 类型只允许注册一个处理器，重复注册在启动期失败
#[derive(Default)]
pub struct CommandBusBuilder {
    handlers: HandlerMap,
    middlewares: Vec<Arc<dyn DispatchMiddleware>>,
}

impl CommandBusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn DispatchMiddleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// 注册 command 处理器
    pub fn register<C: Command + 'static>(
        mut self,
        handler: Arc<dyn CommandHandler<C>>,
    ) -> AppResult<Self> {
        let type_id = TypeId::of::<C>();
        if self.handlers.contains_key(&type_id) {
            return Err(AppError::internal(format!(
                "Duplicate command handler registration for {}",
                type_name::<C>()
            )));
        }
        self.handlers.insert(type_id, Box::new(handler));
        Ok(self)
    }

    pub fn build(self) -> InMemoryCommandBus {
        InMemoryCommandBus {
            handlers: self.handlers,
            middlewares: self.middlewares,
        }
    }
}

/// 进程内 Command Bus
pub struct InMemoryCommandBus {
    handlers: HandlerMap,
    middlewares: Vec<Arc<dyn DispatchMiddleware>>,
}

impl InMemoryCommandBus {
    pub fn builder() -> CommandBusBuilder {
        CommandBusBuilder::new()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn resolve<C: Command + 'static>(&self) -> AppResult<&Arc<dyn CommandHandler<C>>> {
        self.handlers
            .get(&TypeId::of::<C>())
            .and_then(|h| h.downcast_ref::<Arc<dyn CommandHandler<C>>>())
            .ok_or_else(|| {
                AppError::internal(format!(
                    "No command handler registered for {}",
                    type_name::<C>()
                ))
            })
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C: Command + 'static>(&self, command: C) -> AppResult<C::Result> {
        let name = type_name::<C>();

        for mw in &self.middlewares {
            mw.before(RequestKind::Command, name).await?;
        }

        let handler = self.resolve::<C>()?;
        let result = handler.handle(command).await;

        let outcome = result.as_ref().map(|_| ());
        for mw in &self.middlewares {
            mw.after(RequestKind::Command, name, outcome).await;
        }

        result
    }
}

/// Query Bus 构建器
#[derive(Default)]
pub struct QueryBusBuilder {
    handlers: HandlerMap,
    middlewares: Vec<Arc<dyn DispatchMiddleware>>,
}

impl QueryBusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn DispatchMiddleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// 注册 query 处理器
    pub fn register<Q: Query + 'static>(
        mut self,
        handler: Arc<dyn QueryHandler<Q>>,
    ) -> AppResult<Self> {
        let type_id = TypeId::of::<Q>();
        if self.handlers.contains_key(&type_id) {
            return Err(AppError::internal(format!(
                "Duplicate query handler registration for {}",
                type_name::<Q>()
            )));
        }
        self.handlers.insert(type_id, Box::new(handler));
        Ok(self)
    }

    pub fn build(self) -> InMemoryQueryBus {
        InMemoryQueryBus {
            handlers: self.handlers,
            middlewares: self.middlewares,
        }
    }
}

/// 进程内 Query Bus
pub struct InMemoryQueryBus {
    handlers: HandlerMap,
    middlewares: Vec<Arc<dyn DispatchMiddleware>>,
}

impl InMemoryQueryBus {
    pub fn builder() -> QueryBusBuilder {
        QueryBusBuilder::new()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn resolve<Q: Query + 'static>(&self) -> AppResult<&Arc<dyn QueryHandler<Q>>> {
        self.handlers
            .get(&TypeId::of::<Q>())
            .and_then(|h| h.downcast_ref::<Arc<dyn QueryHandler<Q>>>())
            .ok_or_else(|| {
                AppError::internal(format!(
                    "No query handler registered for {}",
                    type_name::<Q>()
                ))
            })
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q: Query + 'static>(&self, query: Q) -> AppResult<Q::Result> {
        let name = type_name::<Q>();

        for mw in &self.middlewares {
            mw.before(RequestKind::Query, name).await?;
        }

        let handler = self.resolve::<Q>()?;
        let result = handler.handle(query).await;

        let outcome = result.as_ref().map(|_| ());
        for mw in &self.middlewares {
            mw.after(RequestKind::Query, name, outcome).await;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoggingMiddleware;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Ping {
        value: u32,
    }

    impl Command for Ping {
        type Result = u32;
    }

    struct PingHandler {
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl CommandHandler<Ping> for PingHandler {
        async fn handle(&self, command: Ping) -> AppResult<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(command.value + 1)
        }
    }

    struct Echo;

    impl Query for Echo {
        type Result = String;
    }

    struct EchoHandler;

    #[async_trait]
    impl QueryHandler<Echo> for EchoHandler {
        async fn handle(&self, _query: Echo) -> AppResult<String> {
            Ok("echo".to_string())
        }
    }

    struct RejectAll;

    #[async_trait]
    impl DispatchMiddleware for RejectAll {
        async fn before(&self, _kind: RequestKind, _name: &str) -> AppResult<()> {
            Err(AppError::forbidden("rejected by middleware"))
        }

        async fn after(&self, _kind: RequestKind, _name: &str, _result: Result<(), &AppError>) {}
    }

    #[tokio::test]
    async fn test_dispatch_resolves_registered_handler() {
        let calls = Arc::new(AtomicU32::new(0));
        let bus = InMemoryCommandBus::builder()
            .register::<Ping>(Arc::new(PingHandler {
                calls: calls.clone(),
            }))
            .unwrap()
            .build();

        let result = bus.dispatch(Ping { value: 41 }).await.unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails_at_build_time() {
        let calls = Arc::new(AtomicU32::new(0));
        let builder = InMemoryCommandBus::builder()
            .register::<Ping>(Arc::new(PingHandler {
                calls: calls.clone(),
            }))
            .unwrap();

        let err = builder
            .register::<Ping>(Arc::new(PingHandler { calls }))
            .err()
            .expect("duplicate registration must fail");
        assert!(err.to_string().contains("Duplicate command handler"));
    }

    #[tokio::test]
    async fn test_dispatch_unregistered_type_fails() {
        let bus = InMemoryCommandBus::builder().build();
        let err = bus.dispatch(Ping { value: 1 }).await.err().unwrap();
        assert!(err.to_string().contains("No command handler registered"));
    }

    #[tokio::test]
    async fn test_middleware_rejection_prevents_handler() {
        let calls = Arc::new(AtomicU32::new(0));
        let bus = InMemoryCommandBus::builder()
            .with_middleware(Arc::new(RejectAll))
            .register::<Ping>(Arc::new(PingHandler {
                calls: calls.clone(),
            }))
            .unwrap()
            .build();

        let err = bus.dispatch(Ping { value: 1 }).await.err().unwrap();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_bus_dispatch() {
        let bus = InMemoryQueryBus::builder()
            .with_middleware(Arc::new(LoggingMiddleware))
            .register::<Echo>(Arc::new(EchoHandler))
            .unwrap()
            .build();

        assert_eq!(bus.dispatch(Echo).await.unwrap(), "echo");
        assert_eq!(bus.handler_count(), 1);
    }
}
