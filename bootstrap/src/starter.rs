//! HTTP 服务启动器
//!
//! 加载配置 -> 初始化运行时 -> 构建基础设施 -> 组装路由 -> 启动并优雅退出

use std::time::Duration;

use axum::{Json, Router, routing::get};
use clubnet_config::AppConfig;
use clubnet_errors::AppResult;
use clubnet_telemetry::init_metrics;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{Infrastructure, init_runtime, shutdown_signal};

/// 启动 HTTP 服务
///
/// `build` 接收初始化完成的基础设施，返回业务路由
pub async fn run_server<F, Fut>(
    config_dir: &str,
    build: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    let metrics_handle = init_metrics();

    let infra = Infrastructure::from_config(config.clone()).await?;
    let app = build(infra).await?;

    let app_name = config.app_name.clone();
    let app = app
        .route(
            "/health",
            get(move || {
                let app_name = app_name.clone();
                async move { Json(serde_json::json!({ "status": "ok", "app": app_name })) }
            }),
        )
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(16 * 1024 * 1024))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
