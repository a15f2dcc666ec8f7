//! 用户管理查询处理器

use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::{PagedResult, UserId};
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::{AppError, AppResult};

use crate::application::auth::UserDto;
use crate::domain::user::UserRepository;

use super::queries::{GetUserQuery, ListUsersQuery, SearchUsersQuery};

/// 用户管理查询处理器
pub struct UserQueryHandler {
    user_repo: Arc<dyn UserRepository>,
}

impl UserQueryHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl QueryHandler<GetUserQuery> for UserQueryHandler {
    async fn handle(&self, query: GetUserQuery) -> AppResult<UserDto> {
        let user_id = UserId::from_string(&query.user_id)
            .map_err(|_| AppError::validation("Invalid user ID"))?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .map(|user| (&user).into())
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[async_trait]
impl QueryHandler<ListUsersQuery> for UserQueryHandler {
    async fn handle(&self, query: ListUsersQuery) -> AppResult<PagedResult<UserDto>> {
        let (users, total) = self
            .user_repo
            .list(query.pagination.page, query.pagination.page_size)
            .await?;

        let users: Vec<UserDto> = users.iter().map(Into::into).collect();
        Ok(PagedResult::new(users, total as u64, &query.pagination))
    }
}

#[async_trait]
impl QueryHandler<SearchUsersQuery> for UserQueryHandler {
    async fn handle(&self, query: SearchUsersQuery) -> AppResult<PagedResult<UserDto>> {
        let (users, total) = self
            .user_repo
            .search(
                &query.query,
                query.pagination.page,
                query.pagination.page_size,
            )
            .await?;

        let users: Vec<UserDto> = users.iter().map(Into::into).collect();
        Ok(PagedResult::new(users, total as u64, &query.pagination))
    }
}
