//! Public endpoint handlers.
//!
//! Error bodies are short human-readable text; clients are expected to key
//! off the HTTP status. The one exception is `/api/login`, whose success
//! body is the raw token.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use comicseek_core::{SeekError, UpdateStats, UpdateStatus};

use crate::ports::FoundComic;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 10;

type TextError = (StatusCode, &'static str);

// ── Ping fan-out ────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub replies: HashMap<String, String>,
}

pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let probes = state.pingers.iter().map(|(name, pinger)| async move {
        let reply = match pinger.ping().await {
            Ok(()) => "ok",
            Err(err) => {
                warn!("{name} did not answer ping: {err}");
                "unavailable"
            }
        };
        (name.to_string(), reply.to_string())
    });
    let replies = futures::future::join_all(probes).await.into_iter().collect();
    Json(PingResponse { replies })
}

// ── Login ───────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(login): Json<LoginRequest>,
) -> Result<String, TextError> {
    if login.name.is_empty() || login.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty name or password"));
    }
    match state.aaa.login(&login.name, &login.password) {
        Ok(token) => Ok(token),
        Err(SeekError::BadCredentials) => Err((StatusCode::UNAUTHORIZED, "bad credentials")),
        Err(err) => {
            error!("login failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
        }
    }
}

// ── Ingestion control ───────────────────────────────────────────

pub async fn db_update(State(state): State<Arc<AppState>>) -> Result<StatusCode, TextError> {
    match state.update.update().await {
        Ok(()) => Ok(StatusCode::OK),
        Err(SeekError::AlreadyExists(_)) => Ok(StatusCode::ACCEPTED),
        Err(err) => {
            error!("update failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "update failed"))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: UpdateStatus,
}

pub async fn db_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, TextError> {
    match state.update.status().await {
        Ok(status) => Ok(Json(StatusResponse { status })),
        Err(err) => {
            error!("status failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "status unavailable"))
        }
    }
}

pub async fn db_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UpdateStats>, TextError> {
    match state.update.stats().await {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => {
            error!("stats failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "stats unavailable"))
        }
    }
}

pub async fn db_drop(State(state): State<Arc<AppState>>) -> Result<StatusCode, TextError> {
    match state.update.drop_comics().await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            error!("drop failed: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "drop failed"))
        }
    }
}

// ── Search ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub phrase: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComicDto {
    pub id: i32,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub comics: Vec<ComicDto>,
    pub total: usize,
}

/// Missing and zero limits fall back to the default; negative and
/// non-numeric values are the caller's mistake.
fn parse_limit(raw: Option<&str>) -> Result<usize, TextError> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(DEFAULT_LIMIT);
    };
    match raw.parse::<i64>() {
        Ok(0) => Ok(DEFAULT_LIMIT),
        Ok(n) if n > 0 => Ok(n as usize),
        _ => Err((StatusCode::BAD_REQUEST, "bad limit")),
    }
}

fn parse_params(params: SearchParams) -> Result<(String, usize), TextError> {
    let limit = parse_limit(params.limit.as_deref())?;
    let phrase = params
        .phrase
        .filter(|p| !p.is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "no phrase"))?;
    Ok((phrase, limit))
}

fn search_response(comics: Vec<FoundComic>) -> Json<SearchResponse> {
    let comics: Vec<ComicDto> = comics
        .into_iter()
        .map(|c| ComicDto { id: c.id, url: c.url })
        .collect();
    Json(SearchResponse {
        total: comics.len(),
        comics,
    })
}

fn search_error(err: SeekError) -> TextError {
    match err {
        SeekError::NotFound(_) => (StatusCode::NOT_FOUND, "no comics found"),
        SeekError::BadArguments(_) => (StatusCode::BAD_REQUEST, "bad phrase"),
        SeekError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "search unavailable"),
        err => {
            error!("search failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "search failed")
        }
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, TextError> {
    let (phrase, limit) = parse_params(params)?;
    state
        .search
        .search(&phrase, limit)
        .await
        .map(search_response)
        .map_err(search_error)
}

pub async fn isearch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, TextError> {
    let (phrase, limit) = parse_params(params)?;
    state
        .search
        .search_index(&phrase, limit)
        .await
        .map(search_response)
        .map_err(search_error)
}
