//! 俱乐部关系查询定义

use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::Query;
use serde::{Deserialize, Serialize};

use crate::domain::connection::Connection;

/// 获取关系详情查询
#[derive(Debug, Clone)]
pub struct GetConnectionQuery {
    pub connection_id: String,
}

impl Query for GetConnectionQuery {
    type Result = Connection;
}

/// 分页列出关系查询
#[derive(Debug, Clone)]
pub struct ListConnectionsQuery {
    pub pagination: Pagination,
}

impl Query for ListConnectionsQuery {
    type Result = PagedResult<Connection>;
}

/// 列出某俱乐部关系查询
#[derive(Debug, Clone)]
pub struct ListClubConnectionsQuery {
    pub club_id: String,
}

impl Query for ListClubConnectionsQuery {
    type Result = Vec<Connection>;
}

/// 俱乐部关系图查询
#[derive(Debug, Clone)]
pub struct GetClubGraphQuery;

/// 图节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub country: String,
    pub logo_file_id: Option<String>,
}

/// 图边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: String,
    pub strength: i16,
}

/// 俱乐部关系图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Query for GetClubGraphQuery {
    type Result = ClubGraph;
}
