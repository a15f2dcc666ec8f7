//! 俱乐部关系命令定义

use clubnet_cqrs_core::Command;
use uuid::Uuid;

use crate::domain::connection::Connection;

/// 强度允许范围
const STRENGTH_RANGE: std::ops::RangeInclusive<i16> = 1..=10;

fn validate_strength(strength: i16) -> Result<(), String> {
    if !STRENGTH_RANGE.contains(&strength) {
        return Err(format!(
            "Strength must be between {} and {}",
            STRENGTH_RANGE.start(),
            STRENGTH_RANGE.end()
        ));
    }
    Ok(())
}

fn validate_notes(notes: Option<&str>) -> Result<(), String> {
    if let Some(notes) = notes
        && notes.len() > 1000
    {
        return Err("Notes cannot exceed 1000 characters".to_string());
    }
    Ok(())
}

/// 创建关系命令
#[derive(Debug, Clone)]
pub struct CreateConnectionCommand {
    pub source_club_id: String,
    pub target_club_id: String,
    pub kind: String,
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
    pub performed_by: Option<Uuid>,
}

impl CreateConnectionCommand {
    /// 验证命令参数
    pub fn validate(&self) -> Result<(), String> {
        if self.source_club_id.is_empty() || self.target_club_id.is_empty() {
            return Err("Both clubs are required".to_string());
        }
        if self.source_club_id == self.target_club_id {
            return Err("A club cannot be connected to itself".to_string());
        }
        validate_strength(self.strength)?;
        validate_notes(self.notes.as_deref())?;
        Ok(())
    }
}

impl Command for CreateConnectionCommand {
    type Result = Connection;
}

/// 更新关系命令
#[derive(Debug, Clone)]
pub struct UpdateConnectionCommand {
    pub connection_id: String,
    pub kind: String,
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
    pub performed_by: Option<Uuid>,
}

impl UpdateConnectionCommand {
    pub fn validate(&self) -> Result<(), String> {
        validate_strength(self.strength)?;
        validate_notes(self.notes.as_deref())?;
        Ok(())
    }
}

impl Command for UpdateConnectionCommand {
    type Result = Connection;
}

/// 删除关系命令
#[derive(Debug, Clone)]
pub struct DeleteConnectionCommand {
    pub connection_id: String,
    pub performed_by: Option<Uuid>,
}

impl Command for DeleteConnectionCommand {
    type Result = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_cmd() -> CreateConnectionCommand {
        CreateConnectionCommand {
            source_club_id: Uuid::now_v7().to_string(),
            target_club_id: Uuid::now_v7().to_string(),
            kind: "rivalry".to_string(),
            strength: 7,
            notes: None,
            established_year: Some(1995),
            performed_by: None,
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(valid_cmd().validate().is_ok());
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut cmd = valid_cmd();
        cmd.target_club_id = cmd.source_club_id.clone();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_strength_out_of_range() {
        let mut cmd = valid_cmd();
        cmd.strength = 0;
        assert!(cmd.validate().is_err());
        cmd.strength = 11;
        assert!(cmd.validate().is_err());
    }
}
