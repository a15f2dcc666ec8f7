//! 俱乐部命令处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_common::UserId;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use tracing::warn;

use crate::domain::club::{Club, ClubId, ClubRepository, events::ClubEvent};
use crate::domain::connection::ConnectionRepository;
use crate::domain::file::{FileId, FileRepository};

use super::commands::{
    CreateClubCommand, DeleteClubCommand, SetClubActiveCommand, SetClubLogoCommand,
    UpdateClubCommand,
};

/// 俱乐部命令处理器
pub struct ClubCommandHandler<EP: EventPublisher> {
    club_repo: Arc<dyn ClubRepository>,
    connection_repo: Arc<dyn ConnectionRepository>,
    file_repo: Arc<dyn FileRepository>,
    event_publisher: Arc<EP>,
}

impl<EP: EventPublisher> ClubCommandHandler<EP> {
    pub fn new(
        club_repo: Arc<dyn ClubRepository>,
        connection_repo: Arc<dyn ConnectionRepository>,
        file_repo: Arc<dyn FileRepository>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            club_repo,
            connection_repo,
            file_repo,
            event_publisher,
        }
    }

    async fn publish(&self, topic: &str, event: &ClubEvent) {
        if let Err(e) = self.event_publisher.publish(topic, event).await {
            warn!(error = %e, topic, "Failed to publish club event");
        }
    }

    async fn load(&self, club_id: &str) -> AppResult<Club> {
        let club_id = ClubId::from_str(club_id)
            .map_err(|_| AppError::validation("Invalid club ID"))?;

        self.club_repo
            .find_by_id(&club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club not found"))
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<CreateClubCommand> for ClubCommandHandler<EP> {
    async fn handle(&self, command: CreateClubCommand) -> AppResult<Club> {
        command.validate().map_err(AppError::validation)?;

        if self.club_repo.exists_by_name(&command.name).await? {
            return Err(AppError::conflict(format!(
                "Club with name '{}' already exists",
                command.name
            )));
        }

        let performed_by = command.performed_by;
        let mut club = command.into_club();
        club.audit_info = clubnet_common::AuditInfo::new(performed_by.map(UserId::from_uuid));

        self.club_repo.create(&club).await?;

        let event = ClubEvent::ClubCreated {
            id: club.id.0,
            name: club.name.clone(),
            by: performed_by,
        };
        self.publish("club.created", &event).await;

        Ok(club)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<UpdateClubCommand> for ClubCommandHandler<EP> {
    async fn handle(&self, command: UpdateClubCommand) -> AppResult<Club> {
        command.validate().map_err(AppError::validation)?;

        let mut club = self.load(&command.club_id).await?;

        // 更名时检查重名
        if !club.name.eq_ignore_ascii_case(&command.name)
            && self.club_repo.exists_by_name(&command.name).await?
        {
            return Err(AppError::conflict(format!(
                "Club with name '{}' already exists",
                command.name
            )));
        }

        club.update_details(
            command.name,
            command.short_name,
            command.country,
            command.city,
            command.founded_year,
            command.stadium,
            command.website,
        );
        club.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.club_repo.update(&club).await?;

        let event = ClubEvent::ClubUpdated {
            id: club.id.0,
            by: command.performed_by,
        };
        self.publish("club.updated", &event).await;

        Ok(club)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<SetClubActiveCommand> for ClubCommandHandler<EP> {
    async fn handle(&self, command: SetClubActiveCommand) -> AppResult<Club> {
        let mut club = self.load(&command.club_id).await?;

        if command.is_active {
            club.activate();
        } else {
            club.deactivate();
        }
        club.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.club_repo.update(&club).await?;

        let event = ClubEvent::ClubUpdated {
            id: club.id.0,
            by: command.performed_by,
        };
        self.publish("club.updated", &event).await;

        Ok(club)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<SetClubLogoCommand> for ClubCommandHandler<EP> {
    async fn handle(&self, command: SetClubLogoCommand) -> AppResult<Club> {
        let mut club = self.load(&command.club_id).await?;

        let file_id = match command.file_id.as_deref() {
            Some(raw) => {
                let file_id = FileId::from_str(raw)
                    .map_err(|_| AppError::validation("Invalid file ID"))?;
                if self.file_repo.find_by_id(&file_id).await?.is_none() {
                    return Err(AppError::not_found("Logo file not found"));
                }
                Some(file_id)
            }
            None => None,
        };

        club.set_logo(file_id);
        club.audit_info
            .update(command.performed_by.map(UserId::from_uuid));

        self.club_repo.update(&club).await?;

        let event = ClubEvent::ClubUpdated {
            id: club.id.0,
            by: command.performed_by,
        };
        self.publish("club.updated", &event).await;

        Ok(club)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<DeleteClubCommand> for ClubCommandHandler<EP> {
    async fn handle(&self, command: DeleteClubCommand) -> AppResult<()> {
        let club = self.load(&command.club_id).await?;

        let connection_count = self.connection_repo.count_by_club(&club.id).await?;
        if connection_count > 0 {
            if !command.force {
                return Err(AppError::failed_precondition(format!(
                    "Club has {} connections; delete them first or pass force",
                    connection_count
                )));
            }
            self.connection_repo.delete_by_club(&club.id).await?;
        }

        self.club_repo.delete(&club.id).await?;

        let event = ClubEvent::ClubDeleted {
            id: club.id.0,
            by: command.performed_by,
        };
        self.publish("club.deleted", &event).await;

        Ok(())
    }
}
