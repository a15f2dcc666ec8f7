//! 用户管理查询定义

use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::Query;

use crate::application::auth::UserDto;

/// 获取用户详情查询
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub user_id: String,
}

impl Query for GetUserQuery {
    type Result = UserDto;
}

/// 分页列出用户查询
#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    pub pagination: Pagination,
}

impl Query for ListUsersQuery {
    type Result = PagedResult<UserDto>;
}

/// 搜索用户查询
#[derive(Debug, Clone)]
pub struct SearchUsersQuery {
    pub query: String,
    pub pagination: Pagination,
}

impl Query for SearchUsersQuery {
    type Result = PagedResult<UserDto>;
}
