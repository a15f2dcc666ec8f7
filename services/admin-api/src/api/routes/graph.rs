//! 俱乐部关系图路由

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain};
use clubnet_cqrs_core::QueryBus;
use clubnet_errors::AppResult;

use crate::api::middleware::enforce;
use crate::application::connection::{ClubGraph, GetClubGraphQuery};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let chain = GuardChain::new().with(AuthenticationGuard);

    Router::new()
        .route("/api/graph", get(get_graph))
        .route_layer(from_fn(move |req, next| enforce(chain.clone(), req, next)))
        .with_state(state)
}

async fn get_graph(State(state): State<AppState>) -> AppResult<Json<ClubGraph>> {
    let graph = state.query_bus.dispatch(GetClubGraphQuery).await?;
    Ok(Json(graph))
}
