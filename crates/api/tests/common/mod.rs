use std::sync::Arc;

use assetdesk_api::config::ServerConfig;
use assetdesk_api::middleware::actor::ACTOR_HEADER;
use assetdesk_api::router::build_app_router;
use assetdesk_api::state::AppState;
use assetdesk_core::memory::{MemoryDirectory, MemoryStore};
use assetdesk_core::scope::DirectoryEntry;
use assetdesk_core::service::AssetService;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Tenant 1 / organization 10.
pub const ACTOR_ORG_A: i64 = 100;
/// Tenant 2 / organization 20.
pub const ACTOR_OTHER_TENANT: i64 = 200;
/// Known to the directory but deactivated.
pub const ACTOR_INACTIVE: i64 = 300;
/// Assignable holders in tenant 1 / organization 10.
pub const HOLDER_1: i64 = 501;
pub const HOLDER_2: i64 = 502;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        bulk_concurrency: 4,
    }
}

/// Build the full application router over fresh in-memory stores.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    let directory = MemoryDirectory::new();
    for (actor_id, tenant_id, organization_id, is_active) in [
        (ACTOR_ORG_A, 1, Some(10), true),
        (ACTOR_OTHER_TENANT, 2, Some(20), true),
        (ACTOR_INACTIVE, 1, Some(10), false),
        (HOLDER_1, 1, Some(10), true),
        (HOLDER_2, 1, Some(10), true),
    ] {
        directory.insert(DirectoryEntry {
            actor_id,
            tenant_id,
            organization_id,
            is_active,
        });
    }

    let config = test_config();
    let service = AssetService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(directory),
        config.bulk_concurrency,
    );
    build_app_router(AppState {
        service,
        pool: None,
        config: Arc::new(config),
    })
}

/// Send a request as `actor`, with an optional JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    actor: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Minimal valid creation payload.
pub fn asset_payload(tag: &str) -> serde_json::Value {
    serde_json::json!({
        "asset_tag": tag,
        "category": "Laptop",
        "brand": "Lenovo",
        "model": "ThinkPad T14",
        "serial_number": format!("SN-{tag}"),
        "purchase_date": "2024-05-17",
        "purchase_cost_cents": 149900,
    })
}
