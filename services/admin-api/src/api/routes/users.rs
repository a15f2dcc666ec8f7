//! 用户管理路由

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain, RoleGuard};
use clubnet_common::{PagedResult, Pagination};
use clubnet_cqrs_core::{CommandBus, QueryBus};
use clubnet_errors::AppResult;
use serde::Deserialize;

use crate::api::middleware::{AuthClaims, enforce};
use crate::application::auth::UserDto;
use crate::application::user::{
    ChangeUserRoleCommand, CreateUserCommand, DeleteUserCommand, GetUserQuery, ListUsersQuery,
    ResetUserPasswordCommand, SearchUsersQuery, SetUserStatusCommand, UpdateUserCommand,
};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let read_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(RoleGuard::any_of(["Admin", "Manager"]));
    let admin_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(RoleGuard::any_of(["Admin"]));

    let read = Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route_layer(from_fn(move |req, next| {
            enforce(read_chain.clone(), req, next)
        }));

    let admin = Router::new()
        .route("/", post(create_user))
        .route("/{id}", put(update_user).delete(delete_user))
        .route("/{id}/role", put(change_user_role))
        .route("/{id}/status", put(set_user_status))
        .route("/{id}/password", put(reset_user_password))
        .route_layer(from_fn(move |req, next| {
            enforce(admin_chain.clone(), req, next)
        }));

    read.merge(admin).with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub q: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<PagedResult<UserDto>>> {
    let pagination = Pagination::new(params.page, params.page_size);

    let result = match params.q {
        Some(q) if !q.trim().is_empty() => {
            state
                .query_bus
                .dispatch(SearchUsersQuery {
                    query: q,
                    pagination,
                })
                .await?
        }
        _ => state.query_bus.dispatch(ListUsersQuery { pagination }).await?,
    };

    Ok(Json(result))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserDto>> {
    let user = state.query_bus.dispatch(GetUserQuery { user_id: id }).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: String,
}

async fn create_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let performed_by = Some(claims.user_id()?.0);

    let user = state
        .command_bus
        .dispatch(CreateUserCommand {
            username: req.username,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role: req.role,
            performed_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub display_name: Option<String>,
}

async fn update_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<UserDto>> {
    let performed_by = Some(claims.user_id()?.0);

    let user = state
        .command_bus
        .dispatch(UpdateUserCommand {
            user_id: id,
            email: req.email,
            display_name: req.display_name,
            performed_by,
        })
        .await?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

async fn change_user_role(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> AppResult<Json<UserDto>> {
    let performed_by = Some(claims.user_id()?.0);

    let user = state
        .command_bus
        .dispatch(ChangeUserRoleCommand {
            user_id: id,
            role: req.role,
            performed_by,
        })
        .await?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

async fn set_user_status(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<UserDto>> {
    let performed_by = Some(claims.user_id()?.0);

    let user = state
        .command_bus
        .dispatch(SetUserStatusCommand {
            user_id: id,
            status: req.status,
            performed_by,
        })
        .await?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

async fn reset_user_password(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let performed_by = Some(claims.user_id()?.0);

    state
        .command_bus
        .dispatch(ResetUserPasswordCommand {
            user_id: id,
            new_password: req.new_password,
            performed_by,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let performed_by = Some(claims.user_id()?.0);

    state
        .command_bus
        .dispatch(DeleteUserCommand {
            user_id: id,
            performed_by,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
