//! 俱乐部关系领域事件

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 关系事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectionEvent {
    ConnectionCreated {
        id: Uuid,
        source_club_id: Uuid,
        target_club_id: Uuid,
        kind: String,
        by: Option<Uuid>,
    },
    ConnectionUpdated {
        id: Uuid,
        by: Option<Uuid>,
    },
    ConnectionDeleted {
        id: Uuid,
        by: Option<Uuid>,
    },
}
