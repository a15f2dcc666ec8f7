//! Admin API - 服务入口

use admin_api::{api, state::AppState};
use clubnet_bootstrap::{Infrastructure, run_server};
use clubnet_errors::AppError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure| async move {
        info!("Initializing Admin API...");

        let pool = infra.postgres_pool();
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {}", e)))?;
        info!("Database migrations applied");

        let state = AppState::build(&infra)?;
        info!(
            commands = state.command_bus.handler_count(),
            queries = state.query_bus.handler_count(),
            "Handler registry built"
        );

        Ok(api::router(state))
    })
    .await
}
