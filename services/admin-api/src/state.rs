//! 应用状态：仓储、处理器注册表、守卫协作者
//!
//! 每个 command/query 类型只注册一个处理器；重复或缺失在启动期报错

use std::sync::Arc;
use std::time::Duration;

use clubnet_adapter_redis::RedisEventPublisher;
use clubnet_auth_core::TokenService;
use clubnet_auth_core::guard::AccessDecider;
use clubnet_bootstrap::Infrastructure;
use clubnet_cqrs_core::{InMemoryCommandBus, InMemoryQueryBus, LoggingMiddleware};
use clubnet_errors::AppResult;
use clubnet_ports::CachePort;

use crate::application::auth::{
    AuthCommandHandler, AuthQueryHandler, GetCurrentUserQuery, LoginCommand, LogoutCommand,
    RefreshTokenCommand,
};
use crate::application::club::{
    ClubCommandHandler, ClubQueryHandler, CreateClubCommand, DeleteClubCommand, GetClubQuery,
    ListClubsQuery, SearchClubsQuery, SetClubActiveCommand, SetClubLogoCommand, UpdateClubCommand,
};
use crate::application::connection::{
    ConnectionCommandHandler, ConnectionQueryHandler, CreateConnectionCommand,
    DeleteConnectionCommand, GetClubGraphQuery, GetConnectionQuery, ListClubConnectionsQuery,
    ListConnectionsQuery, UpdateConnectionCommand,
};
use crate::application::dashboard::{DashboardQueryHandler, GetDashboardStatsQuery};
use crate::application::file::{
    DeleteFileCommand, FileCommandHandler, FileQueryHandler, GetFileContentQuery, GetFileQuery,
    UploadFileCommand,
};
use crate::application::user::{
    ChangeUserRoleCommand, CreateUserCommand, DeleteUserCommand, GetUserQuery, ListUsersQuery,
    ResetUserPasswordCommand, SearchUsersQuery, SetUserStatusCommand, UpdateUserCommand,
    UserCommandHandler, UserQueryHandler,
};
use crate::domain::club::ClubRepository;
use crate::domain::connection::ConnectionRepository;
use crate::domain::file::FileRepository;
use crate::domain::session::SessionRepository;
use crate::domain::user::{LoginAttemptStore, UserRepository};
use crate::infrastructure::access::RbacAccessDecider;
use crate::infrastructure::cache::RedisLoginAttemptStore;
use crate::infrastructure::persistence::{
    PostgresClubRepository, PostgresConnectionRepository, PostgresFileRepository,
    PostgresSessionRepository, PostgresUserRepository,
};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub command_bus: Arc<InMemoryCommandBus>,
    pub query_bus: Arc<InMemoryQueryBus>,
    pub token_service: Arc<TokenService>,
    pub access_decider: Arc<dyn AccessDecider>,
}

impl AppState {
    /// 从基础设施装配应用状态
    pub fn build(infra: &Infrastructure) -> AppResult<Self> {
        let pool = infra.postgres_pool();
        let config = infra.config();

        // 仓储
        let club_repo: Arc<dyn ClubRepository> =
            Arc::new(PostgresClubRepository::new(pool.clone()));
        let connection_repo: Arc<dyn ConnectionRepository> =
            Arc::new(PostgresConnectionRepository::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(pool.clone()));
        let session_repo: Arc<dyn SessionRepository> =
            Arc::new(PostgresSessionRepository::new(pool.clone()));
        let file_repo: Arc<dyn FileRepository> =
            Arc::new(PostgresFileRepository::new(pool.clone()));

        // 缓存与事件
        let redis_cache = Arc::new(infra.redis_cache());
        let cache: Arc<dyn CachePort> = redis_cache.clone();
        let attempts: Arc<dyn LoginAttemptStore> =
            Arc::new(RedisLoginAttemptStore::new(redis_cache));
        let event_publisher: Arc<RedisEventPublisher> =
            Arc::new(infra.event_publisher(&config.app_name));

        let token_service = infra.token_service();

        // 命令处理器
        let auth_handler = Arc::new(AuthCommandHandler::new(
            user_repo.clone(),
            session_repo.clone(),
            attempts,
            token_service.clone(),
            event_publisher.clone(),
        ));
        let club_handler = Arc::new(ClubCommandHandler::new(
            club_repo.clone(),
            connection_repo.clone(),
            file_repo.clone(),
            event_publisher.clone(),
        ));
        let connection_handler = Arc::new(ConnectionCommandHandler::new(
            connection_repo.clone(),
            club_repo.clone(),
            event_publisher.clone(),
        ));
        let user_handler = Arc::new(UserCommandHandler::new(
            user_repo.clone(),
            session_repo.clone(),
            event_publisher.clone(),
        ));
        let file_handler = Arc::new(FileCommandHandler::new(
            file_repo.clone(),
            club_repo.clone(),
            config.upload.max_file_bytes,
        ));

        let command_bus = InMemoryCommandBus::builder()
            .with_middleware(Arc::new(LoggingMiddleware))
            .register::<LoginCommand>(auth_handler.clone())?
            .register::<RefreshTokenCommand>(auth_handler.clone())?
            .register::<LogoutCommand>(auth_handler)?
            .register::<CreateClubCommand>(club_handler.clone())?
            .register::<UpdateClubCommand>(club_handler.clone())?
            .register::<SetClubActiveCommand>(club_handler.clone())?
            .register::<SetClubLogoCommand>(club_handler.clone())?
            .register::<DeleteClubCommand>(club_handler)?
            .register::<CreateConnectionCommand>(connection_handler.clone())?
            .register::<UpdateConnectionCommand>(connection_handler.clone())?
            .register::<DeleteConnectionCommand>(connection_handler)?
            .register::<CreateUserCommand>(user_handler.clone())?
            .register::<UpdateUserCommand>(user_handler.clone())?
            .register::<ChangeUserRoleCommand>(user_handler.clone())?
            .register::<SetUserStatusCommand>(user_handler.clone())?
            .register::<ResetUserPasswordCommand>(user_handler.clone())?
            .register::<DeleteUserCommand>(user_handler)?
            .register::<UploadFileCommand>(file_handler.clone())?
            .register::<DeleteFileCommand>(file_handler)?
            .build();

        // 查询处理器
        let auth_queries = Arc::new(AuthQueryHandler::new(user_repo.clone()));
        let club_queries = Arc::new(ClubQueryHandler::new(club_repo.clone()));
        let connection_queries = Arc::new(ConnectionQueryHandler::new(
            connection_repo.clone(),
            club_repo.clone(),
        ));
        let user_queries = Arc::new(UserQueryHandler::new(user_repo.clone()));
        let file_queries = Arc::new(FileQueryHandler::new(file_repo.clone()));
        let dashboard_queries = Arc::new(DashboardQueryHandler::new(
            club_repo,
            connection_repo,
            user_repo.clone(),
            file_repo,
            cache,
            Duration::from_secs(config.dashboard.stats_ttl_secs),
        ));

        let query_bus = InMemoryQueryBus::builder()
            .with_middleware(Arc::new(LoggingMiddleware))
            .register::<GetCurrentUserQuery>(auth_queries)?
            .register::<GetClubQuery>(club_queries.clone())?
            .register::<ListClubsQuery>(club_queries.clone())?
            .register::<SearchClubsQuery>(club_queries)?
            .register::<GetConnectionQuery>(connection_queries.clone())?
            .register::<ListConnectionsQuery>(connection_queries.clone())?
            .register::<ListClubConnectionsQuery>(connection_queries.clone())?
            .register::<GetClubGraphQuery>(connection_queries)?
            .register::<GetUserQuery>(user_queries.clone())?
            .register::<ListUsersQuery>(user_queries.clone())?
            .register::<SearchUsersQuery>(user_queries)?
            .register::<GetFileQuery>(file_queries.clone())?
            .register::<GetFileContentQuery>(file_queries)?
            .register::<GetDashboardStatsQuery>(dashboard_queries)?
            .build();

        let access_decider: Arc<dyn AccessDecider> =
            Arc::new(RbacAccessDecider::new(user_repo));

        Ok(Self {
            command_bus: Arc::new(command_bus),
            query_bus: Arc::new(query_bus),
            token_service,
            access_decider,
        })
    }
}
