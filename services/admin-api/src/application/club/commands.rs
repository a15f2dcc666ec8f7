//! 俱乐部相关命令定义

use clubnet_cqrs_core::Command;
use uuid::Uuid;

use crate::domain::club::Club;

/// 成立年份允许范围
const FOUNDED_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1850..=2100;

fn validate_club_fields(
    name: &str,
    short_name: Option<&str>,
    country: &str,
    founded_year: Option<i32>,
    website: Option<&str>,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Club name cannot be empty".to_string());
    }
    if name.len() > 120 {
        return Err("Club name cannot exceed 120 characters".to_string());
    }
    if let Some(short) = short_name
        && short.len() > 10
    {
        return Err("Short name cannot exceed 10 characters".to_string());
    }
    if country.trim().is_empty() {
        return Err("Country cannot be empty".to_string());
    }
    if country.len() > 64 {
        return Err("Country cannot exceed 64 characters".to_string());
    }
    if let Some(year) = founded_year
        && !FOUNDED_YEAR_RANGE.contains(&year)
    {
        return Err(format!(
            "Founded year must be between {} and {}",
            FOUNDED_YEAR_RANGE.start(),
            FOUNDED_YEAR_RANGE.end()
        ));
    }
    if let Some(url) = website
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err("Website must be an http(s) URL".to_string());
    }
    Ok(())
}

/// 创建俱乐部命令
#[derive(Debug, Clone)]
pub struct CreateClubCommand {
    pub name: String,
    pub short_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub founded_year: Option<i32>,
    pub stadium: Option<String>,
    pub website: Option<String>,
    /// 执行操作的用户 ID (用于审计)
    pub performed_by: Option<Uuid>,
}

impl CreateClubCommand {
    /// 验证命令参数
    pub fn validate(&self) -> Result<(), String> {
        validate_club_fields(
            &self.name,
            self.short_name.as_deref(),
            &self.country,
            self.founded_year,
            self.website.as_deref(),
        )
    }

    /// 将命令转换为俱乐部实体（移动语义）
    pub fn into_club(self) -> Club {
        let mut club = Club::new(self.name, self.country);
        club.short_name = self.short_name;
        club.city = self.city;
        club.founded_year = self.founded_year;
        club.stadium = self.stadium;
        club.website = self.website;
        club
    }
}

impl Command for CreateClubCommand {
    type Result = Club;
}

/// 更新俱乐部命令
#[derive(Debug, Clone)]
pub struct UpdateClubCommand {
    pub club_id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub founded_year: Option<i32>,
    pub stadium: Option<String>,
    pub website: Option<String>,
    pub performed_by: Option<Uuid>,
}

impl UpdateClubCommand {
    pub fn validate(&self) -> Result<(), String> {
        validate_club_fields(
            &self.name,
            self.short_name.as_deref(),
            &self.country,
            self.founded_year,
            self.website.as_deref(),
        )
    }
}

impl Command for UpdateClubCommand {
    type Result = Club;
}

/// 激活/停用俱乐部命令
#[derive(Debug, Clone)]
pub struct SetClubActiveCommand {
    pub club_id: String,
    pub is_active: bool,
    pub performed_by: Option<Uuid>,
}

impl Command for SetClubActiveCommand {
    type Result = Club;
}

/// 设置俱乐部 logo 命令
#[derive(Debug, Clone)]
pub struct SetClubLogoCommand {
    pub club_id: String,
    /// None 表示清除 logo
    pub file_id: Option<String>,
    pub performed_by: Option<Uuid>,
}

impl Command for SetClubLogoCommand {
    type Result = Club;
}

/// 删除俱乐部命令
#[derive(Debug, Clone)]
pub struct DeleteClubCommand {
    pub club_id: String,
    /// 同时删除其全部关系
    pub force: bool,
    pub performed_by: Option<Uuid>,
}

impl Command for DeleteClubCommand {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateClubCommand {
        CreateClubCommand {
            name: "AFC Wimbledon".to_string(),
            short_name: Some("AFCW".to_string()),
            country: "England".to_string(),
            city: Some("London".to_string()),
            founded_year: Some(2002),
            stadium: None,
            website: Some("https://afcwimbledon.co.uk".to_string()),
            performed_by: None,
        }
    }

    #[test]
    fn test_valid_create_command() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut cmd = valid_create();
        cmd.name = "   ".to_string();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_founded_year_out_of_range() {
        let mut cmd = valid_create();
        cmd.founded_year = Some(1492);
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_website_must_be_http() {
        let mut cmd = valid_create();
        cmd.website = Some("ftp://afcwimbledon.co.uk".to_string());
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_into_club_carries_fields() {
        let club = valid_create().into_club();
        assert_eq!(club.name, "AFC Wimbledon");
        assert_eq!(club.short_name.as_deref(), Some("AFCW"));
        assert_eq!(club.founded_year, Some(2002));
        assert!(club.is_active);
    }
}
