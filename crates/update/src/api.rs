//! HTTP surface of the update service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use comicseek_core::{SeekError, UpdateStats, UpdateStatus};

use crate::service::UpdateService;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: UpdateStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(service: Arc<UpdateService>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/update", post(update))
        .route("/status", get(status))
        .route("/stats", get(stats))
        .route("/comics", delete(drop_comics))
        .with_state(service)
}

fn error_response(err: SeekError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        SeekError::BadArguments(_) => StatusCode::BAD_REQUEST,
        SeekError::BadCredentials => StatusCode::UNAUTHORIZED,
        SeekError::NotFound(_) => StatusCode::NOT_FOUND,
        SeekError::AlreadyExists(_) => StatusCode::CONFLICT,
        SeekError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SeekError::Storage(_) | SeekError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

async fn ping() -> &'static str {
    "ok"
}

async fn update(
    State(service): State<Arc<UpdateService>>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    service
        .update(CancellationToken::new())
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

async fn status(State(service): State<Arc<UpdateService>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: service.status(),
    })
}

async fn stats(
    State(service): State<Arc<UpdateService>>,
) -> Result<Json<UpdateStats>, (StatusCode, Json<ErrorBody>)> {
    service.stats().await.map(Json).map_err(error_response)
}

async fn drop_comics(
    State(service): State<Arc<UpdateService>>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    service
        .drop_comics()
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}
