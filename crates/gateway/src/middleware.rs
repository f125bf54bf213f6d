//! Request middleware: token auth and per-endpoint rate limiting.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::state::AppState;

/// `Authorization: Token <jwt>` guard for admin endpoints.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut parts = value.split_whitespace();
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some("Token"), Some(token), None) => token,
        _ => {
            return (StatusCode::UNAUTHORIZED, "bad authorization header").into_response();
        }
    };
    if state.aaa.verify(token).is_err() {
        return (StatusCode::UNAUTHORIZED, "not authorized").into_response();
    }

    next.run(request).await
}

/// One leaky bucket per wrapped endpoint.
pub fn new_limiter(rps: u32) -> Arc<DefaultDirectRateLimiter> {
    let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Excess requests are answered 503 instead of queueing.
pub async fn rate_limit(
    State(limiter): State<Arc<DefaultDirectRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.check().is_err() {
        return (StatusCode::SERVICE_UNAVAILABLE, "server is busy").into_response();
    }
    next.run(request).await
}
