// src/modules/router/entrance.rs

use crate::core::response;
use crate::middlewares;
use crate::modules::app;
use crate::modules::whitelist::{handlers, service::WhitelistService};
use axum::{
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn app_router(service: Arc<WhitelistService>, cors_origins: Vec<String>) -> Router {
    let router = Router::new()
        .route("/", get(app::root::get_root_handler))
        .route("/api/status", get(app::root::get_status_handler))
        .route("/api/whitelist/check/{address}", get(handlers::check_handler))
        .route("/api/whitelist/list", get(handlers::list_handler))
        .route("/api/whitelist/add", post(handlers::add_handler))
        .route("/api/whitelist/remove", post(handlers::remove_handler))
        .fallback(handler_404)
        .method_not_allowed_fallback(handler_405)
        .with_state(service);
    middlewares::middleware::stack(router, cors_origins)
}

async fn handler_404() -> Response {
    response::not_found()
}

async fn handler_405() -> Response {
    response::method_not_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::whitelist::record::Record;
    use crate::modules::whitelist::service::tests::temp_log;
    use crate::modules::whitelist::store::{MemoryStore, StoreError, TableStore};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct DownStore;

    #[async_trait]
    impl TableStore for DownStore {
        async fn read_table(&self) -> Result<Vec<Record>, StoreError> {
            Err(StoreError::Status { status: 503, body: "backend unavailable".into() })
        }

        async fn write_table(&self, _records: &[Record]) -> Result<(), StoreError> {
            Err(StoreError::Status { status: 503, body: "backend unavailable".into() })
        }

        fn describe(&self) -> String {
            "down".into()
        }
    }

    fn app_with(store: Arc<dyn TableStore>) -> Router {
        let service = Arc::new(WhitelistService::new(store, temp_log()));
        app_router(service, vec!["*".to_string()])
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryStore::new()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn add_check_remove_check_scenario() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/whitelist/add",
            Some(json!({ "address": "1.2.3.4", "owner": "alice", "addedBy": "bob" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["server"]["status"], "active");
        assert!(body["server"]["addedAt"].is_string());

        let (_, body) = send(&app, Method::GET, "/api/whitelist/check/1.2.3.4", None).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["whitelisted"], true);
        assert_eq!(body["server"]["owner"], "alice");
        assert!(body["timestamp"].is_string());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/whitelist/remove",
            Some(json!({ "address": "1.2.3.4" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["server"]["address"], "1.2.3.4");

        let (_, body) = send(&app, Method::GET, "/api/whitelist/check/1.2.3.4", None).await;
        assert_eq!(body["whitelisted"], false);
        assert_eq!(body["server"], Value::Null);
    }

    #[tokio::test]
    async fn add_without_owner_is_bad_request() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/whitelist/add",
            Some(json!({ "address": "1.2.3.4", "addedBy": "bob" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required fields: owner");
    }

    #[tokio::test]
    async fn malformed_body_reports_every_field() {
        let app = app();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/whitelist/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing required fields: address, owner, addedBy");
    }

    #[tokio::test]
    async fn duplicate_add_is_soft_failure() {
        let app = app();
        let payload = json!({ "address": "5.5.5.5", "owner": "o", "addedBy": "a" });
        send(&app, Method::POST, "/api/whitelist/add", Some(payload.clone())).await;
        let (status, body) = send(&app, Method::POST, "/api/whitelist/add", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": false, "message": "Server already exists in whitelist" }));

        let (_, body) = send(&app, Method::GET, "/api/whitelist/list", None).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn remove_unknown_is_soft_failure() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/whitelist/remove",
            Some(json!({ "address": "203.0.113.9" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": false, "message": "Server not found in whitelist" }));
    }

    #[tokio::test]
    async fn remove_without_address_is_bad_request() {
        let (status, body) = send(&app(), Method::POST, "/api/whitelist/remove", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: address");
    }

    #[tokio::test]
    async fn list_hides_inactive_records() {
        let mut inactive = Record::new_active("10.0.0.2".into(), "o".into(), "a".into());
        inactive.status = "suspended".into();
        let store = MemoryStore::with_records(vec![
            Record::new_active("10.0.0.1".into(), "o".into(), "a".into()),
            inactive,
        ]);
        let app = app_with(Arc::new(store));

        let (status, body) = send(&app, Method::GET, "/api/whitelist/list", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["servers"][0]["address"], "10.0.0.1");

        let (_, body) = send(&app, Method::GET, "/api/whitelist/check/10.0.0.2", None).await;
        assert_eq!(body["whitelisted"], false);
    }

    #[tokio::test]
    async fn store_outage_is_a_server_error() {
        let app = app_with(Arc::new(DownStore));
        let (status, body) = send(&app, Method::GET, "/api/whitelist/list", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Whitelist store unavailable");
        assert!(!body.to_string().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn status_and_root() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["service"], "Server Whitelist API");

        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).starts_with("Server Whitelist API v"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (status, body) = send(&app(), Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn wrong_method_is_json_405() {
        let (status, body) = send(&app(), Method::GET, "/api/whitelist/add", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Method not allowed");

        let (status, _) = send(&app(), Method::POST, "/api/whitelist/list", Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_gets_cors_headers() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/whitelist/add")
            .header(header::ORIGIN, "https://dash.example")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://dash.example"
        );
    }
}
