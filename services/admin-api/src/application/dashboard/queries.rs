//! 仪表盘查询定义

use clubnet_cqrs_core::Query;
use serde::{Deserialize, Serialize};

/// 仪表盘统计查询
#[derive(Debug, Clone)]
pub struct GetDashboardStatsQuery {
    /// 跳过缓存强制重算
    pub refresh: bool,
}

/// 仪表盘统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub clubs_total: i64,
    pub clubs_active: i64,
    pub connections_total: i64,
    pub connections_by_kind: Vec<KindCount>,
    pub users_total: i64,
    pub users_active: i64,
    pub files_total: i64,
}

/// 按关系类型的计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: String,
    pub count: i64,
}

impl Query for GetDashboardStatsQuery {
    type Result = DashboardStats;
}
