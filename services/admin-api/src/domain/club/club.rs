//! 俱乐部实体

use clubnet_common::AuditInfo;
use clubnet_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::file::FileId;

/// 俱乐部 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClubId(pub Uuid);

impl ClubId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ClubId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClubId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClubId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 俱乐部实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub short_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub founded_year: Option<i32>,
    pub stadium: Option<String>,
    pub website: Option<String>,
    pub logo_file_id: Option<FileId>,
    pub is_active: bool,
    pub audit_info: AuditInfo,
}

impl Club {
    pub fn new(name: String, country: String) -> Self {
        Self {
            id: ClubId::new(),
            name,
            short_name: None,
            country,
            city: None,
            founded_year: None,
            stadium: None,
            website: None,
            logo_file_id: None,
            is_active: true,
            audit_info: AuditInfo::default(),
        }
    }

    /// 更新基础信息
    pub fn update_details(
        &mut self,
        name: String,
        short_name: Option<String>,
        country: String,
        city: Option<String>,
        founded_year: Option<i32>,
        stadium: Option<String>,
        website: Option<String>,
    ) {
        self.name = name;
        self.short_name = short_name;
        self.country = country;
        self.city = city;
        self.founded_year = founded_year;
        self.stadium = stadium;
        self.website = website;
    }

    pub fn set_logo(&mut self, file_id: Option<FileId>) {
        self.logo_file_id = file_id;
    }

    /// 激活俱乐部
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// 停用俱乐部
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl Entity for Club {
    type Id = ClubId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Club {
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
    fn test_create_club() {
        let club = Club::new("FC United".to_string(), "England".to_string());

        assert_eq!(club.name, "FC United");
        assert_eq!(club.country, "England");
        assert!(club.is_active);
        assert!(club.logo_file_id.is_none());
    }

    #[test]
    fn test_activate_deactivate() {
        let mut club = Club::new("FC United".to_string(), "England".to_string());

        club.deactivate();
        assert!(!club.is_active);

        club.activate();
        assert!(club.is_active);
    }

    #[test]
    fn test_update_details() {
        let mut club = Club::new("FC United".to_string(), "England".to_string());
        club.update_details(
            "FC United of Manchester".to_string(),
            Some("FCUM".to_string()),
            "England".to_string(),
            Some("Manchester".to_string()),
            Some(2005),
            Some("Broadhurst Park".to_string()),
            None,
        );

        assert_eq!(club.name, "FC United of Manchester");
        assert_eq!(club.founded_year, Some(2005));
    }
}
