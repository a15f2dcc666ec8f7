//! 俱乐部查询处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::PagedResult;
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::{AppError, AppResult};

use crate::domain::club::{Club, ClubId, ClubRepository};

use super::queries::{GetClubQuery, ListClubsQuery, SearchClubsQuery};

/// 俱乐部查询处理器
pub struct ClubQueryHandler {
    club_repo: Arc<dyn ClubRepository>,
}

impl ClubQueryHandler {
    pub fn new(club_repo: Arc<dyn ClubRepository>) -> Self {
        Self { club_repo }
    }
}

#[async_trait]
impl QueryHandler<GetClubQuery> for ClubQueryHandler {
    async fn handle(&self, query: GetClubQuery) -> AppResult<Club> {
        let club_id = ClubId::from_str(&query.club_id)
            .map_err(|_| AppError::validation("Invalid club ID"))?;

        self.club_repo
            .find_by_id(&club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club not found"))
    }
}

#[async_trait]
impl QueryHandler<ListClubsQuery> for ClubQueryHandler {
    async fn handle(&self, query: ListClubsQuery) -> AppResult<PagedResult<Club>> {
        let (clubs, total) = self
            .club_repo
            .list(
                query.pagination.page,
                query.pagination.page_size,
                query.include_inactive,
            )
            .await?;

        Ok(PagedResult::new(clubs, total as u64, &query.pagination))
    }
}

#[async_trait]
impl QueryHandler<SearchClubsQuery> for ClubQueryHandler {
    async fn handle(&self, query: SearchClubsQuery) -> AppResult<PagedResult<Club>> {
        let (clubs, total) = self
            .club_repo
            .search(
                &query.query,
                query.pagination.page,
                query.pagination.page_size,
            )
            .await?;

        Ok(PagedResult::new(clubs, total as u64, &query.pagination))
    }
}
