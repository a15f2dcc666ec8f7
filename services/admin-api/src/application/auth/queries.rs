//! 认证查询定义

use clubnet_common::UserId;
use clubnet_cqrs_core::Query;

use super::dto::UserDto;

/// 获取当前用户查询
#[derive(Debug, Clone)]
pub struct GetCurrentUserQuery {
    pub user_id: UserId,
}

impl Query for GetCurrentUserQuery {
    type Result = UserDto;
}
