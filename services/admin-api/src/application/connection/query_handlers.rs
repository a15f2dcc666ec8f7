//! 俱乐部关系查询处理器

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::PagedResult;
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::{AppError, AppResult};

use crate::domain::club::{ClubId, ClubRepository};
use crate::domain::connection::{Connection, ConnectionId, ConnectionRepository};

use super::queries::{
    ClubGraph, GetClubGraphQuery, GetConnectionQuery, GraphEdge, GraphNode,
    ListClubConnectionsQuery, ListConnectionsQuery,
};

/// 俱乐部关系查询处理器
pub struct ConnectionQueryHandler {
    connection_repo: Arc<dyn ConnectionRepository>,
    club_repo: Arc<dyn ClubRepository>,
}

impl ConnectionQueryHandler {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepository>,
        club_repo: Arc<dyn ClubRepository>,
    ) -> Self {
        Self {
            connection_repo,
            club_repo,
        }
    }
}

#[async_trait]
impl QueryHandler<GetConnectionQuery> for ConnectionQueryHandler {
    async fn handle(&self, query: GetConnectionQuery) -> AppResult<Connection> {
        let connection_id = ConnectionId::from_str(&query.connection_id)
            .map_err(|_| AppError::validation("Invalid connection ID"))?;

        self.connection_repo
            .find_by_id(&connection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Connection not found"))
    }
}

#[async_trait]
impl QueryHandler<ListConnectionsQuery> for ConnectionQueryHandler {
    async fn handle(&self, query: ListConnectionsQuery) -> AppResult<PagedResult<Connection>> {
        let (connections, total) = self
            .connection_repo
            .list(query.pagination.page, query.pagination.page_size)
            .await?;

        Ok(PagedResult::new(connections, total as u64, &query.pagination))
    }
}

#[async_trait]
impl QueryHandler<ListClubConnectionsQuery> for ConnectionQueryHandler {
    async fn handle(&self, query: ListClubConnectionsQuery) -> AppResult<Vec<Connection>> {
        let club_id = ClubId::from_str(&query.club_id)
            .map_err(|_| AppError::validation("Invalid club ID"))?;

        if self.club_repo.find_by_id(&club_id).await?.is_none() {
            return Err(AppError::not_found("Club not found"));
        }

        self.connection_repo.list_by_club(&club_id).await
    }
}

#[async_trait]
impl QueryHandler<GetClubGraphQuery> for ConnectionQueryHandler {
    async fn handle(&self, _query: GetClubGraphQuery) -> AppResult<ClubGraph> {
        let clubs = self.club_repo.list_active().await?;
        let connections = self.connection_repo.list_all().await?;

        let node_ids: HashSet<String> = clubs.iter().map(|c| c.id.to_string()).collect();

        let nodes = clubs
            .into_iter()
            .map(|club| GraphNode {
                id: club.id.to_string(),
                label: club.name,
                country: club.country,
                logo_file_id: club.logo_file_id.map(|f| f.to_string()),
            })
            .collect();

        // 只保留两端都是活跃俱乐部的边
        let edges = connections
            .into_iter()
            .filter(|conn| {
                node_ids.contains(&conn.source_club_id.to_string())
                    && node_ids.contains(&conn.target_club_id.to_string())
            })
            .map(|conn| GraphEdge {
                id: conn.id.to_string(),
                source: conn.source_club_id.to_string(),
                target: conn.target_club_id.to_string(),
                kind: conn.kind.to_string(),
                strength: conn.strength,
            })
            .collect();

        Ok(ClubGraph { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::club::{Club, MockClubRepository};
    use crate::domain::connection::{ConnectionKind, MockConnectionRepository};

    #[tokio::test]
    async fn test_graph_filters_edges_to_active_nodes() {
        let active_a = Club::new("A".to_string(), "England".to_string());
        let active_b = Club::new("B".to_string(), "England".to_string());
        let inactive = {
            let mut c = Club::new("C".to_string(), "England".to_string());
            c.deactivate();
            c
        };

        let visible = Connection::new(
            active_a.id.clone(),
            active_b.id.clone(),
            ConnectionKind::Partnership,
            5,
        );
        // 指向停用俱乐部的边应被过滤
        let hidden = Connection::new(
            active_a.id.clone(),
            inactive.id.clone(),
            ConnectionKind::Friendly,
            3,
        );

        let mut club_repo = MockClubRepository::new();
        let actives = vec![active_a.clone(), active_b.clone()];
        club_repo
            .expect_list_active()
            .returning(move || Ok(actives.clone()));

        let mut connection_repo = MockConnectionRepository::new();
        let all = vec![visible.clone(), hidden.clone()];
        connection_repo
            .expect_list_all()
            .returning(move || Ok(all.clone()));

        let handler = ConnectionQueryHandler::new(Arc::new(connection_repo), Arc::new(club_repo));

        let graph = handler.handle(GetClubGraphQuery).await.unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, visible.id.to_string());
        assert_eq!(graph.edges[0].kind, "partnership");
    }
}
