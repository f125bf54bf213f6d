//! HTTP router construction.
//!
//! Assembles routes, the token guard on admin endpoints, and one rate
//! limiter per search endpoint.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::middleware::{new_limiter, rate_limit, require_token};
use crate::state::AppState;
use crate::api;

pub fn build_router(state: Arc<AppState>, search_rps: u32) -> Router {
    let admin = from_fn_with_state(Arc::clone(&state), require_token);

    Router::new()
        .route("/api/ping", get(api::ping))
        .route("/api/login", post(api::login))
        .route(
            "/api/db/update",
            post(api::db_update).route_layer(admin.clone()),
        )
        .route("/api/db/status", get(api::db_status))
        .route("/api/db/stats", get(api::db_stats))
        .route("/api/db", delete(api::db_drop).route_layer(admin))
        .route(
            "/api/search",
            get(api::search).route_layer(from_fn_with_state(new_limiter(search_rps), rate_limit)),
        )
        .route(
            "/api/isearch",
            get(api::isearch).route_layer(from_fn_with_state(new_limiter(search_rps), rate_limit)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
