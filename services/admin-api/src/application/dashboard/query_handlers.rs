//! 仪表盘查询处理器
//!
//! cache-aside：命中直接返回，未命中重算并回填

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clubnet_cqrs_core::QueryHandler;
use clubnet_errors::AppResult;
use clubnet_ports::CachePort;
use tracing::warn;

use crate::domain::club::ClubRepository;
use crate::domain::connection::ConnectionRepository;
use crate::domain::file::FileRepository;
use crate::domain::user::UserRepository;

use super::queries::{DashboardStats, GetDashboardStatsQuery, KindCount};

const STATS_CACHE_KEY: &str = "dashboard:stats";

/// 仪表盘查询处理器
pub struct DashboardQueryHandler {
    club_repo: Arc<dyn ClubRepository>,
    connection_repo: Arc<dyn ConnectionRepository>,
    user_repo: Arc<dyn UserRepository>,
    file_repo: Arc<dyn FileRepository>,
    cache: Arc<dyn CachePort>,
    cache_ttl: Duration,
}

impl DashboardQueryHandler {
    pub fn new(
        club_repo: Arc<dyn ClubRepository>,
        connection_repo: Arc<dyn ConnectionRepository>,
        user_repo: Arc<dyn UserRepository>,
        file_repo: Arc<dyn FileRepository>,
        cache: Arc<dyn CachePort>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            club_repo,
            connection_repo,
            user_repo,
            file_repo,
            cache,
            cache_ttl,
        }
    }

    async fn compute(&self) -> AppResult<DashboardStats> {
        let connections_by_kind = self
            .connection_repo
            .count_by_kind()
            .await?
            .into_iter()
            .map(|(kind, count)| KindCount {
                kind: kind.to_string(),
                count,
            })
            .collect();

        Ok(DashboardStats {
            clubs_total: self.club_repo.count().await?,
            clubs_active: self.club_repo.count_active().await?,
            connections_total: self.connection_repo.count().await?,
            connections_by_kind,
            users_total: self.user_repo.count().await?,
            users_active: self.user_repo.count_active().await?,
            files_total: self.file_repo.count().await?,
        })
    }
}

#[async_trait]
impl QueryHandler<GetDashboardStatsQuery> for DashboardQueryHandler {
    async fn handle(&self, query: GetDashboardStatsQuery) -> AppResult<DashboardStats> {
        if !query.refresh
            && let Some(cached) = self.cache.get(STATS_CACHE_KEY).await?
        {
            match serde_json::from_str::<DashboardStats>(&cached) {
                Ok(stats) => return Ok(stats),
                Err(e) => warn!(error = %e, "Discarding unreadable cached stats"),
            }
        }

        let stats = self.compute().await?;

        match serde_json::to_string(&stats) {
            Ok(payload) => {
                if let Err(e) = self
                    .cache
                    .set(STATS_CACHE_KEY, &payload, Some(self.cache_ttl))
                    .await
                {
                    warn!(error = %e, "Failed to cache dashboard stats");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize dashboard stats"),
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::club::MockClubRepository;
    use crate::domain::connection::{ConnectionKind, MockConnectionRepository};
    use crate::domain::file::MockFileRepository;
    use crate::domain::user::MockUserRepository;
    use std::sync::Mutex;

    /// 进程内缓存测试替身
    #[derive(Default)]
    struct InMemoryCache {
        entries: Mutex<std::collections::HashMap<String, String>>,
    }

    #[async_trait]
    impl CachePort for InMemoryCache {
        async fn get(&self, key: &str) -> AppResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> AppResult<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn exists(&self, key: &str) -> AppResult<bool> {
            Ok(self.entries.lock().unwrap().contains_key(key))
        }

        async fn expire(&self, _key: &str, _ttl: Duration) -> AppResult<()> {
            Ok(())
        }
    }

    fn counting_repos() -> (
        MockClubRepository,
        MockConnectionRepository,
        MockUserRepository,
        MockFileRepository,
    ) {
        let mut club_repo = MockClubRepository::new();
        club_repo.expect_count().returning(|| Ok(12));
        club_repo.expect_count_active().returning(|| Ok(10));

        let mut connection_repo = MockConnectionRepository::new();
        connection_repo.expect_count().returning(|| Ok(30));
        connection_repo
            .expect_count_by_kind()
            .returning(|| Ok(vec![(ConnectionKind::Rivalry, 18), (ConnectionKind::Friendly, 12)]));

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_count().returning(|| Ok(5));
        user_repo.expect_count_active().returning(|| Ok(4));

        let mut file_repo = MockFileRepository::new();
        file_repo.expect_count().returning(|| Ok(7));

        (club_repo, connection_repo, user_repo, file_repo)
    }

    #[tokio::test]
    async fn test_stats_computed_and_cached() {
        let (club_repo, connection_repo, user_repo, file_repo) = counting_repos();
        let cache = Arc::new(InMemoryCache::default());

        let handler = DashboardQueryHandler::new(
            Arc::new(club_repo),
            Arc::new(connection_repo),
            Arc::new(user_repo),
            Arc::new(file_repo),
            cache.clone(),
            Duration::from_secs(60),
        );

        let stats = handler
            .handle(GetDashboardStatsQuery { refresh: false })
            .await
            .unwrap();
        assert_eq!(stats.clubs_total, 12);
        assert_eq!(stats.connections_by_kind.len(), 2);

        // 第二次命中缓存
        assert!(cache.get(STATS_CACHE_KEY).await.unwrap().is_some());
        let again = handler
            .handle(GetDashboardStatsQuery { refresh: false })
            .await
            .unwrap();
        assert_eq!(again, stats);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_repositories() {
        let cache = Arc::new(InMemoryCache::default());
        let precomputed = DashboardStats {
            clubs_total: 1,
            clubs_active: 1,
            connections_total: 0,
            connections_by_kind: vec![],
            users_total: 1,
            users_active: 1,
            files_total: 0,
        };
        cache
            .set(
                STATS_CACHE_KEY,
                &serde_json::to_string(&precomputed).unwrap(),
                None,
            )
            .await
            .unwrap();

        // 仓储不设任何期望：被调用即失败
        let handler = DashboardQueryHandler::new(
            Arc::new(MockClubRepository::new()),
            Arc::new(MockConnectionRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockFileRepository::new()),
            cache,
            Duration::from_secs(60),
        );

        let stats = handler
            .handle(GetDashboardStatsQuery { refresh: false })
            .await
            .unwrap();
        assert_eq!(stats, precomputed);
    }
}
