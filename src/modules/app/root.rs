// src/modules/app/root.rs

use crate::core::response;
use axum::response::Response;
use serde_json::json;

pub const SERVICE_NAME: &str = "Server Whitelist API";

// Plain-text banner for humans poking at the root URL.
pub async fn get_root_handler() -> String {
    format!("{} v{}\n", SERVICE_NAME, env!("CARGO_PKG_VERSION"))
}

pub async fn get_status_handler() -> Response {
    response::success(json!({
        "status": "online",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
