//! 会话实体
//!
//! 保存刷新令牌哈希；刷新时轮换哈希

use chrono::{DateTime, Utc};
use clubnet_common::UserId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// 会话 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会话实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// 刷新令牌的 SHA-256 哈希，明文不落库
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, refresh_token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            refresh_token_hash,
            expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        }
    }

    /// 计算刷新令牌哈希
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// 会话是否可用于刷新
    pub fn is_live(&self) -> bool {
        !self.is_expired() && !self.is_revoked()
    }

    pub fn revoke(&mut self) {
        self.revoked_at = Some(Utc::now());
    }

    /// 轮换刷新令牌
    pub fn rotate(&mut self, new_token_hash: String, expires_at: DateTime<Utc>) {
        self.refresh_token_hash = new_token_hash;
        self.expires_at = expires_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let a = Session::hash_token("token-1");
        let b = Session::hash_token("token-1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, Session::hash_token("token-2"));
    }

    #[test]
    fn test_live_expired_revoked() {
        let mut session = Session::new(
            UserId::new(),
            Session::hash_token("t"),
            Utc::now() + Duration::hours(1),
        );
        assert!(session.is_live());

        session.revoke();
        assert!(!session.is_live());

        let expired = Session::new(
            UserId::new(),
            Session::hash_token("t"),
            Utc::now() - Duration::hours(1),
        );
        assert!(expired.is_expired());
        assert!(!expired.is_live());
    }
}
