//! 俱乐部相关查询定义

use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::Query;

use crate::domain::club::Club;

/// 获取俱乐部详情查询
#[derive(Debug, Clone)]
pub struct GetClubQuery {
    pub club_id: String,
}

impl Query for GetClubQuery {
    type Result = Club;
}

/// 分页列出俱乐部查询
#[derive(Debug, Clone)]
pub struct ListClubsQuery {
    pub pagination: Pagination,
    pub include_inactive: bool,
}

impl Query for ListClubsQuery {
    type Result = PagedResult<Club>;
}

/// 搜索俱乐部查询
#[derive(Debug, Clone)]
pub struct SearchClubsQuery {
    pub query: String,
    pub pagination: Pagination,
}

impl Query for SearchClubsQuery {
    type Result = PagedResult<Club>;
}
