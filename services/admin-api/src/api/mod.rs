//! HTTP API 层

pub mod middleware;
pub mod routes;

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::state::AppState;

/// 组装业务路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", routes::auth::routes(state.clone()))
        .nest("/api/clubs", routes::clubs::routes(state.clone()))
        .nest("/api/connections", routes::connections::routes(state.clone()))
        .nest("/api/users", routes::users::routes(state.clone()))
        .nest("/api/files", routes::files::routes(state.clone()))
        .nest("/api/dashboard", routes::dashboard::routes(state.clone()))
        .merge(routes::graph::routes(state.clone()))
        .layer(from_fn_with_state(state, middleware::attach_claims))
}
