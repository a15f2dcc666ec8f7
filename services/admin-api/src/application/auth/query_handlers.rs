//! 认证查询处理器

use std::sync::Arc;

use async_trait::async_trait;
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::{AppError, AppResult};

use crate::domain::user::UserRepository;

use super::dto::UserDto;
use super::queries::GetCurrentUserQuery;

/// 认证查询处理器
pub struct AuthQueryHandler {
    user_repo: Arc<dyn UserRepository>,
}

impl AuthQueryHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl QueryHandler<GetCurrentUserQuery> for AuthQueryHandler {
    async fn handle(&self, query: GetCurrentUserQuery) -> AppResult<UserDto> {
        self.user_repo
            .find_by_id(&query.user_id)
            .await?
            .map(|user| (&user).into())
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
