//! 基于 Redis 的登录失败计数

use std::sync::Arc;

use async_trait::async_trait;
use clubnet_adapter_redis::RedisCache;
use clubnet_common::UserId;
use clubnet_errors::AppResult;
use clubnet_ports::CachePort;

use crate::domain::user::LoginAttemptStore;

/// 失败计数窗口（秒）
const ATTEMPT_WINDOW_SECS: u64 = 900;
/// 锁定阈值
const LOCK_THRESHOLD: i64 = 5;

/// Redis 登录失败计数存储
///
/// 计数键带窗口 TTL，窗口过后自动解锁
pub struct RedisLoginAttemptStore {
    cache: Arc<RedisCache>,
}

impl RedisLoginAttemptStore {
    pub fn new(cache: Arc<RedisCache>) -> Self {
        Self { cache }
    }

    fn key(user_id: &UserId) -> String {
        format!("auth:failed_attempts:{}", user_id)
    }
}

#[async_trait]
impl LoginAttemptStore for RedisLoginAttemptStore {
    async fn record_failure(&self, user_id: &UserId) -> AppResult<i64> {
        self.cache
            .incr_with_ttl(&Self::key(user_id), ATTEMPT_WINDOW_SECS)
            .await
    }

    async fn is_locked(&self, user_id: &UserId) -> AppResult<bool> {
        let count = self
            .cache
            .get(&Self::key(user_id))
            .await?
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);

        Ok(count >= LOCK_THRESHOLD)
    }

    async fn clear(&self, user_id: &UserId) -> AppResult<()> {
        self.cache.delete(&Self::key(user_id)).await
    }
}
