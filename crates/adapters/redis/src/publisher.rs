//! Redis 事件发布器（PUBLISH）

use async_trait::async_trait;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use redis::aio::ConnectionManager;
use serde::Serialize;

/// 基于 Redis pub/sub 的事件发布器
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: ConnectionManager,
    channel_prefix: String,
}

impl RedisEventPublisher {
    pub fn new(conn: ConnectionManager, channel_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            channel_prefix: channel_prefix.into(),
        }
    }

    fn channel(&self, topic: &str) -> String {
        format!("{}:{}", self.channel_prefix, topic)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish<E: Serialize + Send + Sync>(&self, topic: &str, event: &E) -> AppResult<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| AppError::internal(format!("Failed to serialize event: {}", e)))?;
        self.publish_raw(topic, &payload).await
    }

    async fn publish_raw(&self, topic: &str, payload: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PUBLISH")
            .arg(self.channel(topic))
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| AppError::internal(format!("Redis publish failed: {}", e)))?;
        Ok(())
    }
}
