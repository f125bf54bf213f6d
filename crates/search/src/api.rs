//! HTTP surface of the search service.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use comicseek_core::SeekError;

use crate::service::{SearchOutcome, SearchService};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub phrase: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComicReply {
    pub id: i32,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchReply {
    pub comics: Vec<ComicReply>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

const DEFAULT_LIMIT: usize = 10;

pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/search", get(search))
        .route("/isearch", get(isearch))
        .with_state(service)
}

async fn ping() -> &'static str {
    "ok"
}

async fn search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchReply>, (StatusCode, Json<ErrorBody>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let outcome = service
        .search(&params.phrase, limit)
        .await
        .map_err(error_response)?;
    reply(outcome)
}

async fn isearch(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchReply>, (StatusCode, Json<ErrorBody>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let outcome = service
        .search_index(&params.phrase, limit)
        .await
        .map_err(error_response)?;
    reply(outcome)
}

/// Partial results win over a late failure; an empty result is 404.
fn reply(outcome: SearchOutcome) -> Result<Json<SearchReply>, (StatusCode, Json<ErrorBody>)> {
    if let Some(err) = &outcome.error {
        warn!("search degraded: {err}");
    }
    if outcome.comics.is_empty() {
        return match outcome.error {
            Some(err) => Err(error_response(err)),
            None => Err((
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "nothing found".into(),
                }),
            )),
        };
    }
    Ok(Json(SearchReply {
        comics: outcome
            .comics
            .into_iter()
            .map(|c| ComicReply { id: c.id, url: c.url })
            .collect(),
    }))
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
