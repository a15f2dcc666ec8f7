//! 俱乐部关系路由

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain, PermissionGuard};
use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::{CommandBus, QueryBus};
use clubnet_errors::AppResult;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AuthClaims, enforce};
use crate::application::connection::{
    CreateConnectionCommand, DeleteConnectionCommand, GetConnectionQuery,
    ListClubConnectionsQuery, ListConnectionsQuery, UpdateConnectionCommand,
};
use crate::domain::connection::Connection;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let read_chain = GuardChain::new().with(AuthenticationGuard);
    let write_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(PermissionGuard::any_of(["connections:write"]));

    let read = Router::new()
        .route("/", get(list_connections))
        .route("/{id}", get(get_connection))
        .route_layer(from_fn(move |req, next| {
            enforce(read_chain.clone(), req, next)
        }));

    let write = Router::new()
        .route("/", post(create_connection))
        .route("/{id}", put(update_connection).delete(delete_connection))
        .route_layer(from_fn(move |req, next| {
            enforce(write_chain.clone(), req, next)
        }));

    read.merge(write).with_state(state)
}

// ============ DTO ============

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub id: String,
    pub source_club_id: String,
    pub target_club_id: String,
    pub kind: String,
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Connection> for ConnectionResponse {
    fn from(connection: Connection) -> Self {
        Self {
            id: connection.id.to_string(),
            source_club_id: connection.source_club_id.to_string(),
            target_club_id: connection.target_club_id.to_string(),
            kind: connection.kind.to_string(),
            strength: connection.strength,
            notes: connection.notes,
            established_year: connection.established_year,
            created_at: connection.audit_info.created_at,
            updated_at: connection.audit_info.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListConnectionsParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// 按俱乐部过滤
    pub club_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub source_club_id: String,
    pub target_club_id: String,
    pub kind: String,
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConnectionRequest {
    pub kind: String,
    pub strength: i16,
    pub notes: Option<String>,
    pub established_year: Option<i32>,
}

// ============ Handlers ============

async fn list_connections(
    State(state): State<AppState>,
    Query(params): Query<ListConnectionsParams>,
) -> AppResult<Json<PagedResult<ConnectionResponse>>> {
    if let Some(club_id) = params.club_id {
        let connections = state
            .query_bus
            .dispatch(ListClubConnectionsQuery { club_id })
            .await?;

        let total = connections.len() as u64;
        let items: Vec<ConnectionResponse> =
            connections.into_iter().map(Into::into).collect();
        return Ok(Json(PagedResult {
            items,
            total,
            page: 1,
            page_size: total.max(1) as u32,
        }));
    }

    let pagination = Pagination::new(params.page, params.page_size);
    let result = state
        .query_bus
        .dispatch(ListConnectionsQuery { pagination })
        .await?;

    Ok(Json(result.map(ConnectionResponse::from)))
}

async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ConnectionResponse>> {
    let connection = state
        .query_bus
        .dispatch(GetConnectionQuery { connection_id: id })
        .await?;

    Ok(Json(connection.into()))
}

async fn create_connection(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreateConnectionRequest>,
) -> AppResult<(StatusCode, Json<ConnectionResponse>)> {
    let performed_by = Some(claims.user_id()?.0);

    let connection = state
        .command_bus
        .dispatch(CreateConnectionCommand {
            source_club_id: req.source_club_id,
            target_club_id: req.target_club_id,
            kind: req.kind,
            strength: req.strength,
            notes: req.notes,
            established_year: req.established_year,
            performed_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(connection.into())))
}

async fn update_connection(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<UpdateConnectionRequest>,
) -> AppResult<Json<ConnectionResponse>> {
    let performed_by = Some(claims.user_id()?.0);

    let connection = state
        .command_bus
        .dispatch(UpdateConnectionCommand {
            connection_id: id,
            kind: req.kind,
            strength: req.strength,
            notes: req.notes,
            established_year: req.established_year,
            performed_by,
        })
        .await?;

    Ok(Json(connection.into()))
}

async fn delete_connection(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let performed_by = Some(claims.user_id()?.0);

    state
        .command_bus
        .dispatch(DeleteConnectionCommand {
            connection_id: id,
            performed_by,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
