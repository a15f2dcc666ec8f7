//! 俱乐部领域事件

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 俱乐部事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClubEvent {
    ClubCreated {
        id: Uuid,
        name: String,
        by: Option<Uuid>,
    },
    ClubUpdated {
        id: Uuid,
        by: Option<Uuid>,
    },
    ClubDeleted {
        id: Uuid,
        by: Option<Uuid>,
    },
}
