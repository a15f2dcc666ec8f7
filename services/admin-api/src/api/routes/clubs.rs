//! 俱乐部路由

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use clubnet_auth_core::guard::{
    AuthenticationGuard, GuardChain, PermissionGuard, ResourceActionGuard,
};
use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::{CommandBus, QueryBus};
use clubnet_errors::AppResult;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AuthClaims, enforce};
use crate::application::club::{
    CreateClubCommand, DeleteClubCommand, GetClubQuery, ListClubsQuery, SearchClubsQuery,
    SetClubActiveCommand, SetClubLogoCommand, UpdateClubCommand,
};
use crate::domain::club::Club;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let read_chain = GuardChain::new().with(AuthenticationGuard);
    let write_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(PermissionGuard::any_of(["clubs:write"]));
    // 删除通过授权协作者按当前数据库角色判定
    let delete_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(ResourceActionGuard::new(
            "clubs",
            "delete",
            state.access_decider.clone(),
        ));

    let read = Router::new()
        .route("/", get(list_clubs))
        .route("/{id}", get(get_club))
        .route_layer(from_fn(move |req, next| {
            enforce(read_chain.clone(), req, next)
        }));

    let write = Router::new()
        .route("/", post(create_club))
        .route("/{id}", put(update_club))
        .route("/{id}/active", put(set_club_active))
        .route("/{id}/logo", put(set_club_logo))
        .route_layer(from_fn(move |req, next| {
            enforce(write_chain.clone(), req, next)
        }));

    let remove = Router::new()
        .route("/{id}", delete(delete_club))
        .route_layer(from_fn(move |req, next| {
            enforce(delete_chain.clone(), req, next)
        }));

    read.merge(write).merge(remove).with_state(state)
}

// ============ DTO ============

#[derive(Debug, Serialize)]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub founded_year: Option<i32>,
    pub stadium: Option<String>,
    pub website: Option<String>,
    pub logo_file_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Club> for ClubResponse {
    fn from(club: Club) -> Self {
        Self {
            id: club.id.to_string(),
            name: club.name,
            short_name: club.short_name,
            country: club.country,
            city: club.city,
            founded_year: club.founded_year,
            stadium: club.stadium,
            website: club.website,
            logo_file_id: club.logo_file_id.map(|f| f.to_string()),
            is_active: club.is_active,
            created_at: club.audit_info.created_at,
            updated_at: club.audit_info.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListClubsParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// 模糊搜索
    pub q: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ClubPayload {
    pub name: String,
    pub short_name: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub founded_year: Option<i32>,
    pub stadium: Option<String>,
    pub website: Option<String>,
}

// ============ Handlers ============

async fn list_clubs(
    State(state): State<AppState>,
    Query(params): Query<ListClubsParams>,
) -> AppResult<Json<PagedResult<ClubResponse>>> {
    let pagination = Pagination::new(params.page, params.page_size);

    let result = match params.q {
        Some(q) if !q.trim().is_empty() => {
            state
                .query_bus
                .dispatch(SearchClubsQuery {
                    query: q,
                    pagination,
                })
                .await?
        }
        _ => {
            state
                .query_bus
                .dispatch(ListClubsQuery {
                    pagination,
                    include_inactive: params.include_inactive,
                })
                .await?
        }
    };

    Ok(Json(result.map(ClubResponse::from)))
}

async fn get_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClubResponse>> {
    let club = state.query_bus.dispatch(GetClubQuery { club_id: id }).await?;
    Ok(Json(club.into()))
}

async fn create_club(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<ClubPayload>,
) -> AppResult<(StatusCode, Json<ClubResponse>)> {
    let performed_by = Some(claims.user_id()?.0);

    let club = state
        .command_bus
        .dispatch(CreateClubCommand {
            name: payload.name,
            short_name: payload.short_name,
            country: payload.country,
            city: payload.city,
            founded_year: payload.founded_year,
            stadium: payload.stadium,
            website: payload.website,
            performed_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(club.into())))
}

async fn update_club(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(payload): Json<ClubPayload>,
) -> AppResult<Json<ClubResponse>> {
    let performed_by = Some(claims.user_id()?.0);

    let club = state
        .command_bus
        .dispatch(UpdateClubCommand {
            club_id: id,
            name: payload.name,
            short_name: payload.short_name,
            country: payload.country,
            city: payload.city,
            founded_year: payload.founded_year,
            stadium: payload.stadium,
            website: payload.website,
            performed_by,
        })
        .await?;

    Ok(Json(club.into()))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

async fn set_club_active(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> AppResult<Json<ClubResponse>> {
    let performed_by = Some(claims.user_id()?.0);

    let club = state
        .command_bus
        .dispatch(SetClubActiveCommand {
            club_id: id,
            is_active: req.is_active,
            performed_by,
        })
        .await?;

    Ok(Json(club.into()))
}

#[derive(Debug, Deserialize)]
pub struct SetLogoRequest {
    pub file_id: Option<String>,
}

async fn set_club_logo(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<SetLogoRequest>,
) -> AppResult<Json<ClubResponse>> {
    let performed_by = Some(claims.user_id()?.0);

    let club = state
        .command_bus
        .dispatch(SetClubLogoCommand {
            club_id: id,
            file_id: req.file_id,
            performed_by,
        })
        .await?;

    Ok(Json(club.into()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteClubParams {
    #[serde(default)]
    pub force: bool,
}

async fn delete_club(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Query(params): Query<DeleteClubParams>,
) -> AppResult<StatusCode> {
    let performed_by = Some(claims.user_id()?.0);

    state
        .command_bus
        .dispatch(DeleteClubCommand {
            club_id: id,
            force: params.force,
            performed_by,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
