//! 用户领域事件

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserEvent {
    UserCreated {
        id: Uuid,
        username: String,
        role: String,
        by: Option<Uuid>,
    },
    UserUpdated {
        id: Uuid,
        by: Option<Uuid>,
    },
    UserDeleted {
        id: Uuid,
        by: Option<Uuid>,
    },
    UserLoggedIn {
        id: Uuid,
        timestamp: DateTime<Utc>,
    },
}
