#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use timebook_api::config::ServerConfig;
use timebook_api::router::build_app_router;
use timebook_api::state::AppState;
use timebook_reconcile::{BatchReconciler, EntryReconciler, ReconcileConfig};
use timebook_trac::InMemoryTicketService;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".parse().unwrap()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router backed by `tickets`.
pub fn build_test_app_with(pool: PgPool, tickets: Arc<InMemoryTicketService>) -> Router {
    let config = test_config();
    let reconcile = ReconcileConfig::default();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        entries: EntryReconciler::new(tickets, reconcile.clone()),
        batch: BatchReconciler::new(reconcile),
    };
    build_app_router(state, &config)
}

/// Build the full application router with an empty ticket tracker.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(InMemoryTicketService::new()))
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
