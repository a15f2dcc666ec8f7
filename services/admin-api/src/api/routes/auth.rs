//! 认证路由

use axum::http::HeaderMap;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain};
use clubnet_cqrs_core::{CommandBus, QueryBus};
use clubnet_errors::AppResult;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AuthClaims, enforce};
use crate::application::auth::{
    GetCurrentUserQuery, LoginCommand, LogoutCommand, RefreshTokenCommand, TokenPair, UserDto,
};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let auth_chain = GuardChain::new().with(AuthenticationGuard);

    let public = Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token));

    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .route_layer(from_fn(move |req, next| {
            enforce(auth_chain.clone(), req, next)
        }));

    public.merge(protected).with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub user: UserDto,
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string());

    let result = state
        .command_bus
        .dispatch(LoginCommand {
            username: req.username,
            password: req.password,
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
        expires_in: result.tokens.expires_in,
        token_type: result.tokens.token_type,
        user: result.user,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state
        .command_bus
        .dispatch(RefreshTokenCommand {
            refresh_token: req.refresh_token,
        })
        .await?;

    Ok(Json(tokens))
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> AppResult<Json<SuccessResponse>> {
    state
        .command_bus
        .dispatch(LogoutCommand {
            refresh_token: req.refresh_token,
        })
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

async fn get_current_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> AppResult<Json<UserDto>> {
    let user_id = claims.user_id()?;

    let user = state
        .query_bus
        .dispatch(GetCurrentUserQuery { user_id })
        .await?;

    Ok(Json(user))
}
