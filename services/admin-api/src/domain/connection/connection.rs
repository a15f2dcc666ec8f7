//! 俱乐部关系实体

use clubnet_common::AuditInfo;
use clubnet_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::club::ClubId;

/// 关系 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Partnership,
    Friendly,
    Rivalry,
    PlayerTransfer,
    YouthExchange,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partnership => "partnership",
            Self::Friendly => "friendly",
            Self::Rivalry => "rivalry",
            Self::PlayerTransfer => "player_transfer",
            Self::YouthExchange => "youth_exchange",
        }
    }

    pub fn all() -> &'static [ConnectionKind] {
        &[
            Self::Partnership,
            Self::Friendly,
            Self::Rivalry,
            Self::PlayerTransfer,
            Self::YouthExchange,
        ]
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partnership" => Ok(Self::Partnership),
            "friendly" => Ok(Self::Friendly),
            "rivalry" => Ok(Self::Rivalry),
            "player_transfer" => Ok(Self::PlayerTransfer),
            "youth_exchange" => Ok(Self::YouthExchange),
            other => Err(format!("Unknown connection kind: {}", other)),
        }
    }
}

/// 俱乐部关系实体
///
/// 同一对俱乐部同一类型的关系最多存在一条（无向）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source_club_id: ClubId,
    pub target_club_id: ClubId,
    pub kind: ConnectionKind,
    /// 关系强度 1..=10
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
    pub audit_info: AuditInfo,
}

impl Connection {
    pub fn new(
        source_club_id: ClubId,
        target_club_id: ClubId,
        kind: ConnectionKind,
        strength: i16,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            source_club_id,
            target_club_id,
            kind,
            strength,
            notes: None,
            established_year: None,
            audit_info: AuditInfo::default(),
        }
    }

    /// 更新关系属性
    pub fn update(
        &mut self,
        kind: ConnectionKind,
        strength: i16,
        notes: Option<String>,
        established_year: Option<i32>,
    ) {
        self.kind = kind;
        self.strength = strength;
        self.notes = notes;
        self.established_year = established_year;
    }

    /// 是否连接了给定俱乐部
    pub fn involves(&self, club_id: &ClubId) -> bool {
        &self.source_club_id == club_id || &self.target_club_id == club_id
    }
}

impl Entity for Connection {
    type Id = ConnectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Connection {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in ConnectionKind::all() {
            let parsed: ConnectionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
        assert!("derby".parse::<ConnectionKind>().is_err());
    }

    #[test]
    fn test_involves() {
        let a = ClubId::new();
        let b = ClubId::new();
        let c = ClubId::new();
        let conn = Connection::new(a.clone(), b.clone(), ConnectionKind::Rivalry, 8);

        assert!(conn.involves(&a));
        assert!(conn.involves(&b));
        assert!(!conn.involves(&c));
    }
}
