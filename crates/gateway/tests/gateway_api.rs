//! Router-level tests with fake downstream services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use comicseek_core::config::GatewayConfig;
use comicseek_core::{SeekError, UpdateStats, UpdateStatus};
use comicseek_gateway::ports::{FoundComic, Pinger, SearchApi, UpdateApi};
use comicseek_gateway::{build_router, Aaa, AppState};

// ── Fakes ───────────────────────────────────────────────────────

struct OkPinger;

#[async_trait]
impl Pinger for OkPinger {
    async fn ping(&self) -> Result<(), SeekError> {
        Ok(())
    }
}

struct DownPinger;

#[async_trait]
impl Pinger for DownPinger {
    async fn ping(&self) -> Result<(), SeekError> {
        Err(SeekError::Unavailable("connection refused".into()))
    }
}

#[derive(Default)]
struct FakeSearch {
    comics: Vec<FoundComic>,
    last_limit: Mutex<Option<usize>>,
    last_strategy: Mutex<Option<&'static str>>,
}

impl FakeSearch {
    fn with_comics(comics: Vec<FoundComic>) -> Self {
        Self {
            comics,
            ..Self::default()
        }
    }

    fn answer(&self, limit: usize, strategy: &'static str) -> Result<Vec<FoundComic>, SeekError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        *self.last_strategy.lock().unwrap() = Some(strategy);
        if self.comics.is_empty() {
            return Err(SeekError::NotFound("nothing found".into()));
        }
        Ok(self.comics.clone())
    }
}

#[async_trait]
impl SearchApi for FakeSearch {
    async fn search(&self, _phrase: &str, limit: usize) -> Result<Vec<FoundComic>, SeekError> {
        self.answer(limit, "storage")
    }

    async fn search_index(
        &self,
        _phrase: &str,
        limit: usize,
    ) -> Result<Vec<FoundComic>, SeekError> {
        self.answer(limit, "index")
    }
}

struct FakeUpdate {
    busy: bool,
}

#[async_trait]
impl UpdateApi for FakeUpdate {
    async fn update(&self) -> Result<(), SeekError> {
        if self.busy {
            return Err(SeekError::AlreadyExists("update already running".into()));
        }
        Ok(())
    }

    async fn status(&self) -> Result<UpdateStatus, SeekError> {
        Ok(if self.busy {
            UpdateStatus::Running
        } else {
            UpdateStatus::Idle
        })
    }

    async fn stats(&self) -> Result<UpdateStats, SeekError> {
        Ok(UpdateStats {
            words_total: 42,
            words_unique: 7,
            comics_fetched: 3,
            comics_total: 3100,
        })
    }

    async fn drop_comics(&self) -> Result<(), SeekError> {
        Ok(())
    }
}

// ── Harness ─────────────────────────────────────────────────────

fn gateway_config() -> GatewayConfig {
    GatewayConfig {
        address: "127.0.0.1:0".into(),
        words_url: String::new(),
        search_url: String::new(),
        update_url: String::new(),
        token_ttl_secs: 3600,
        search_rps: 100,
        admin_user: Some("admin".into()),
        admin_password: Some("password".into()),
        token_secret: "test-secret".into(),
    }
}

fn app_with(search: Arc<FakeSearch>, update: Arc<FakeUpdate>, search_rps: u32) -> Router {
    let mut pingers: HashMap<&'static str, Arc<dyn Pinger>> = HashMap::new();
    pingers.insert("words", Arc::new(OkPinger));
    pingers.insert("search", Arc::new(OkPinger));
    pingers.insert("update", Arc::new(DownPinger));

    let state = Arc::new(AppState {
        aaa: Aaa::from_config(&gateway_config()).unwrap(),
        pingers,
        search,
        update,
    });
    build_router(state, search_rps)
}

fn app() -> Router {
    app_with(
        Arc::new(FakeSearch::with_comics(vec![
            FoundComic {
                id: 303,
                url: "https://imgs.xkcd.com/comics/compiling.png".into(),
            },
            FoundComic {
                id: 1700,
                url: "https://imgs.xkcd.com/comics/new_bug.png".into(),
            },
        ])),
        Arc::new(FakeUpdate { busy: false }),
        100,
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn login_token(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"name":"admin","password":"password"}"#,
        ))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_empty());
    body
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap()
}

// ── Ping ────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_reports_per_service_health() {
    let app = app();
    let (status, body) = get(&app, "/api/ping").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["replies"]["words"], "ok");
    assert_eq!(json["replies"]["search"], "ok");
    assert_eq!(json["replies"]["update"], "unavailable");
}

// ── Login & token guard ─────────────────────────────────────────

#[tokio::test]
async fn login_then_admin_call_succeeds() {
    let app = app();
    let token = login_token(&app).await;

    let (status, _) = send(&app, authed("DELETE", "/api/db", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, authed("POST", "/api/db/update", &token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"admin","password":"wrong"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_empty_fields() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"","password":"password"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_endpoints_require_a_valid_token() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/db/update")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, authed("POST", "/api/db/update", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/db")
        .header(header::AUTHORIZATION, "Bearer sometoken")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Ingestion control ───────────────────────────────────────────

#[tokio::test]
async fn second_update_reports_accepted() {
    let app = app_with(
        Arc::new(FakeSearch::default()),
        Arc::new(FakeUpdate { busy: true }),
        100,
    );
    let token = login_token(&app).await;
    let (status, _) = send(&app, authed("POST", "/api/db/update", &token)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn status_and_stats_are_public() {
    let app = app();

    let (status, body) = get(&app, "/api/db/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "idle");

    let (status, body) = get(&app, "/api/db/stats").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["words_total"], 42);
    assert_eq!(json["words_unique"], 7);
    assert_eq!(json["comics_fetched"], 3);
    assert_eq!(json["comics_total"], 3100);
}

#[tokio::test]
async fn running_pass_is_reported() {
    let app = app_with(
        Arc::new(FakeSearch::default()),
        Arc::new(FakeUpdate { busy: true }),
        100,
    );
    let (status, body) = get(&app, "/api/db/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "running");
}

// ── Search ──────────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_comics_and_total() {
    let app = app();
    let (status, body) = get(&app, "/api/search?phrase=linux&limit=5").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["comics"][0]["id"], 303);
    assert_eq!(
        json["comics"][0]["url"],
        "https://imgs.xkcd.com/comics/compiling.png"
    );
}

#[tokio::test]
async fn search_validates_parameters() {
    let app = app();

    let (status, _) = get(&app, "/api/search?limit=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/search?phrase=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/search?phrase=linux&limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/search?phrase=linux&limit=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_and_zero_limits_default_to_ten() {
    let search = Arc::new(FakeSearch::with_comics(vec![FoundComic {
        id: 1,
        url: "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg".into(),
    }]));
    let app = app_with(Arc::clone(&search), Arc::new(FakeUpdate { busy: false }), 100);

    let (status, _) = get(&app, "/api/search?phrase=barrel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*search.last_limit.lock().unwrap(), Some(10));

    let (status, _) = get(&app, "/api/search?phrase=barrel&limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*search.last_limit.lock().unwrap(), Some(10));
}

#[tokio::test]
async fn empty_search_result_is_not_found() {
    let app = app_with(
        Arc::new(FakeSearch::default()),
        Arc::new(FakeUpdate { busy: false }),
        100,
    );
    let (status, _) = get(&app, "/api/search?phrase=nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn isearch_uses_the_index_strategy() {
    let search = Arc::new(FakeSearch::with_comics(vec![FoundComic {
        id: 2,
        url: "https://imgs.xkcd.com/comics/tree.png".into(),
    }]));
    let app = app_with(Arc::clone(&search), Arc::new(FakeUpdate { busy: false }), 100);

    let (status, _) = get(&app, "/api/isearch?phrase=tree").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*search.last_strategy.lock().unwrap(), Some("index"));
}

// ── Rate limiting ───────────────────────────────────────────────

#[tokio::test]
async fn excess_search_load_is_rejected_with_busy() {
    let app = app_with(
        Arc::new(FakeSearch::with_comics(vec![FoundComic {
            id: 1,
            url: "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg".into(),
        }])),
        Arc::new(FakeUpdate { busy: false }),
        1,
    );

    let mut ok = 0;
    let mut busy = 0;
    for _ in 0..10 {
        let (status, _) = get(&app, "/api/search?phrase=barrel").await;
        match status {
            StatusCode::OK => ok += 1,
            StatusCode::SERVICE_UNAVAILABLE => busy += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert!(ok >= 1, "at least the first request must pass");
    assert!(busy >= 7, "excess requests must be rejected, got {busy}");
}

#[tokio::test]
async fn each_search_endpoint_has_its_own_bucket() {
    let app = app_with(
        Arc::new(FakeSearch::with_comics(vec![FoundComic {
            id: 1,
            url: "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg".into(),
        }])),
        Arc::new(FakeUpdate { busy: false }),
        1,
    );

    // Drain the /api/search bucket.
    for _ in 0..5 {
        let _ = get(&app, "/api/search?phrase=barrel").await;
    }
    // /api/isearch keeps its own bucket.
    let (status, _) = get(&app, "/api/isearch?phrase=barrel").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_endpoints_are_not_rate_limited() {
    let app = app_with(
        Arc::new(FakeSearch::default()),
        Arc::new(FakeUpdate { busy: false }),
        1,
    );
    let token = login_token(&app).await;
    for _ in 0..5 {
        let (status, _) = send(&app, authed("POST", "/api/db/update", &token)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
