//! 俱乐部关系命令处理器

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use clubnet_cqrs_core::CommandHandler;
use clubnet_errors::{AppError, AppResult};
use clubnet_ports::EventPublisher;
use tracing::warn;

use crate::domain::club::{ClubId, ClubRepository};
use crate::domain::connection::{
    Connection, ConnectionId, ConnectionKind, ConnectionRepository, events::ConnectionEvent,
};

use super::commands::{
    CreateConnectionCommand, DeleteConnectionCommand, UpdateConnectionCommand,
};

/// 俱乐部关系命令处理器
pub struct ConnectionCommandHandler<EP: EventPublisher> {
    connection_repo: Arc<dyn ConnectionRepository>,
    club_repo: Arc<dyn ClubRepository>,
    event_publisher: Arc<EP>,
}

impl<EP: EventPublisher> ConnectionCommandHandler<EP> {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepository>,
        club_repo: Arc<dyn ClubRepository>,
        event_publisher: Arc<EP>,
    ) -> Self {
        Self {
            connection_repo,
            club_repo,
            event_publisher,
        }
    }

    async fn publish(&self, topic: &str, event: &ConnectionEvent) {
        if let Err(e) = self.event_publisher.publish(topic, event).await {
            warn!(error = %e, topic, "Failed to publish connection event");
        }
    }

    async fn require_club(&self, raw_id: &str) -> AppResult<ClubId> {
        let club_id =
            ClubId::from_str(raw_id).map_err(|_| AppError::validation("Invalid club ID"))?;

        if self.club_repo.find_by_id(&club_id).await?.is_none() {
            return Err(AppError::not_found(format!("Club {} not found", raw_id)));
        }
        Ok(club_id)
    }

    fn parse_kind(raw: &str) -> AppResult<ConnectionKind> {
        ConnectionKind::from_str(raw).map_err(AppError::validation)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<CreateConnectionCommand>
    for ConnectionCommandHandler<EP>
{
    async fn handle(&self, command: CreateConnectionCommand) -> AppResult<Connection> {
        command.validate().map_err(AppError::validation)?;

        let kind = Self::parse_kind(&command.kind)?;
        let source = self.require_club(&command.source_club_id).await?;
        let target = self.require_club(&command.target_club_id).await?;

        if self
            .connection_repo
            .exists_between(&source, &target, kind)
            .await?
        {
            return Err(AppError::conflict(format!(
                "A {} connection between these clubs already exists",
                kind
            )));
        }

        let mut connection = Connection::new(source, target, kind, command.strength);
        connection.notes = command.notes;
        connection.established_year = command.established_year;
        connection.audit_info = clubnet_common::AuditInfo::new(
            command.performed_by.map(clubnet_common::UserId::from_uuid),
        );

        self.connection_repo.create(&connection).await?;

        let event = ConnectionEvent::ConnectionCreated {
            id: connection.id.0,
            source_club_id: connection.source_club_id.0,
            target_club_id: connection.target_club_id.0,
            kind: kind.to_string(),
            by: command.performed_by,
        };
        self.publish("connection.created", &event).await;

        Ok(connection)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<UpdateConnectionCommand>
    for ConnectionCommandHandler<EP>
{
    async fn handle(&self, command: UpdateConnectionCommand) -> AppResult<Connection> {
        command.validate().map_err(AppError::validation)?;

        let kind = Self::parse_kind(&command.kind)?;
        let connection_id = ConnectionId::from_str(&command.connection_id)
            .map_err(|_| AppError::validation("Invalid connection ID"))?;

        let mut connection = self
            .connection_repo
            .find_by_id(&connection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Connection not found"))?;

        // 变更类型时同样要维持 (俱乐部对, 类型) 唯一
        if connection.kind != kind
            && self
                .connection_repo
                .exists_between(&connection.source_club_id, &connection.target_club_id, kind)
                .await?
        {
            return Err(AppError::conflict(format!(
                "A {} connection between these clubs already exists",
                kind
            )));
        }

        connection.update(
            kind,
            command.strength,
            command.notes,
            command.established_year,
        );
        connection
            .audit_info
            .update(command.performed_by.map(clubnet_common::UserId::from_uuid));

        self.connection_repo.update(&connection).await?;

        let event = ConnectionEvent::ConnectionUpdated {
            id: connection.id.0,
            by: command.performed_by,
        };
        self.publish("connection.updated", &event).await;

        Ok(connection)
    }
}

#[async_trait]
impl<EP: EventPublisher> CommandHandler<DeleteConnectionCommand>
    for ConnectionCommandHandler<EP>
{
    async fn handle(&self, command: DeleteConnectionCommand) -> AppResult<()> {
        let connection_id = ConnectionId::from_str(&command.connection_id)
            .map_err(|_| AppError::validation("Invalid connection ID"))?;

        let connection = self
            .connection_repo
            .find_by_id(&connection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Connection not found"))?;

        self.connection_repo.delete(&connection.id).await?;

        let event = ConnectionEvent::ConnectionDeleted {
            id: connection.id.0,
            by: command.performed_by,
        };
        self.publish("connection.deleted", &event).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::club::{Club, MockClubRepository};
    use crate::domain::connection::MockConnectionRepository;
    use serde::Serialize;
    use uuid::Uuid;

    struct NoopPublisher;

    #[async_trait]
    impl EventPublisher for NoopPublisher {
        async fn publish<E: Serialize + Send + Sync>(
            &self,
            _topic: &str,
            _event: &E,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn publish_raw(&self, _topic: &str, _payload: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn handler(
        connection_repo: MockConnectionRepository,
        club_repo: MockClubRepository,
    ) -> ConnectionCommandHandler<NoopPublisher> {
        ConnectionCommandHandler::new(
            Arc::new(connection_repo),
            Arc::new(club_repo),
            Arc::new(NoopPublisher),
        )
    }

    fn cmd(source: &str, target: &str) -> CreateConnectionCommand {
        CreateConnectionCommand {
            source_club_id: source.to_string(),
            target_club_id: target.to_string(),
            kind: "partnership".to_string(),
            strength: 5,
            notes: None,
            established_year: None,
            performed_by: None,
        }
    }

    #[tokio::test]
    async fn test_self_loop_never_reaches_repositories() {
        let handler = handler(MockConnectionRepository::new(), MockClubRepository::new());
        let id = Uuid::now_v7().to_string();

        let err = handler.handle(cmd(&id, &id)).await.err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected() {
        let handler = handler(MockConnectionRepository::new(), MockClubRepository::new());
        let mut command = cmd(
            &Uuid::now_v7().to_string(),
            &Uuid::now_v7().to_string(),
        );
        command.kind = "derby".to_string();

        let err = handler.handle(command).await.err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_pair_conflicts() {
        let mut club_repo = MockClubRepository::new();
        club_repo.expect_find_by_id().returning(|_| {
            Ok(Some(Club::new("X".to_string(), "England".to_string())))
        });

        let mut connection_repo = MockConnectionRepository::new();
        connection_repo
            .expect_exists_between()
            .returning(|_, _, _| Ok(true));

        let handler = handler(connection_repo, club_repo);

        let err = handler
            .handle(cmd(
                &Uuid::now_v7().to_string(),
                &Uuid::now_v7().to_string(),
            ))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_persists_connection() {
        let mut club_repo = MockClubRepository::new();
        club_repo.expect_find_by_id().returning(|_| {
            Ok(Some(Club::new("X".to_string(), "England".to_string())))
        });

        let mut connection_repo = MockConnectionRepository::new();
        connection_repo
            .expect_exists_between()
            .returning(|_, _, _| Ok(false));
        connection_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(()));

        let handler = handler(connection_repo, club_repo);

        let connection = handler
            .handle(cmd(
                &Uuid::now_v7().to_string(),
                &Uuid::now_v7().to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(connection.kind, ConnectionKind::Partnership);
        assert_eq!(connection.strength, 5);
    }
}
