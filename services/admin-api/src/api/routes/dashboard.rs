//! 仪表盘路由

use axum::extract::{Query, State};
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain, PermissionGuard};
use clubnet_cqrs_core::QueryBus;
use clubnet_errors::AppResult;
use serde::Deserialize;

use crate::api::middleware::enforce;
use crate::application::dashboard::{DashboardStats, GetDashboardStatsQuery};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(PermissionGuard::any_of(["dashboard:read"]));

    Router::new()
        .route("/stats", get(get_stats))
        .route_layer(from_fn(move |req, next| enforce(chain.clone(), req, next)))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub refresh: bool,
}

async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<Json<DashboardStats>> {
    let stats = state
        .query_bus
        .dispatch(GetDashboardStatsQuery {
            refresh: params.refresh,
        })
        .await?;

    Ok(Json(stats))
}
