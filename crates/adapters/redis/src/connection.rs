//! Redis 连接管理

use clubnet_errors::{AppError, AppResult};
use redis::aio::ConnectionManager;

/// 创建 Redis 连接管理器
pub async fn create_connection_manager(url: &str) -> AppResult<ConnectionManager> {
    let client = redis::Client::open(url)
        .map_err(|e| AppError::internal(format!("Invalid Redis URL: {}", e)))?;

    ConnectionManager::new(client)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to Redis: {}", e)))
}
