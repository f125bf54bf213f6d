//! HTTP surface of the words service.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

#[derive(Debug, Serialize, Deserialize)]
pub struct NormRequest {
    pub phrase: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormResponse {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/norm", post(norm))
}

async fn ping() -> &'static str {
    "ok"
}

/// Normalization is pure CPU work; every rejection here is a phrase-size
/// violation, rendered as 413.
async fn norm(
    Json(req): Json<NormRequest>,
) -> Result<Json<NormResponse>, (StatusCode, Json<ErrorBody>)> {
    match normalize(&req.phrase) {
        Ok(words) => Ok(Json(NormResponse { words })),
        Err(err) => {
            tracing::warn!("norm rejected: {err}");
            Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            ))
        }
    }
}
