//! 文件路由

use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use clubnet_auth_core::guard::{AuthenticationGuard, GuardChain, PermissionGuard};
use clubnet_cqrs_core::{CommandBus, QueryBus};
use clubnet_errors::{AppError, AppResult};
use serde::Serialize;

use crate::api::middleware::{AuthClaims, enforce};
use crate::application::file::{
    DeleteFileCommand, GetFileContentQuery, GetFileQuery, UploadFileCommand,
};
use crate::domain::file::StoredFile;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let read_chain = GuardChain::new().with(AuthenticationGuard);
    let write_chain = GuardChain::new()
        .with(AuthenticationGuard)
        .with(PermissionGuard::any_of(["files:write"]));

    let read = Router::new()
        .route("/{id}", get(get_file))
        .route("/{id}/content", get(download_file))
        .route_layer(from_fn(move |req, next| {
            enforce(read_chain.clone(), req, next)
        }));

    let write = Router::new()
        .route("/", post(upload_file))
        .route("/{id}", delete(delete_file))
        .route_layer(from_fn(move |req, next| {
            enforce(write_chain.clone(), req, next)
        }));

    read.merge(write).with_state(state)
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id.to_string(),
            filename: file.filename,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            sha256: file.sha256,
            created_at: file.created_at,
        }
    }
}

async fn upload_file(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<FileResponse>)> {
    let performed_by = Some(claims.user_id()?.0);

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::validation("Missing file field"))?;

    let filename = field
        .file_name()
        .map(String::from)
        .ok_or_else(|| AppError::validation("Missing filename"))?;
    let content_type = field
        .content_type()
        .map(String::from)
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let content = field
        .bytes()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read file: {}", e)))?
        .to_vec();

    let file = state
        .command_bus
        .dispatch(UploadFileCommand {
            filename,
            content_type,
            content,
            performed_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(file.into())))
}

async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FileResponse>> {
    let file = state.query_bus.dispatch(GetFileQuery { file_id: id }).await?;
    Ok(Json(file.into()))
}

async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let download = state
        .query_bus
        .dispatch(GetFileContentQuery { file_id: id })
        .await?;

    let headers = [
        (header::CONTENT_TYPE, download.meta.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.meta.filename),
        ),
    ];

    Ok((headers, download.content).into_response())
}

async fn delete_file(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let performed_by = Some(claims.user_id()?.0);

    state
        .command_bus
        .dispatch(DeleteFileCommand {
            file_id: id,
            performed_by,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
