// src/middlewares/request_log.rs

use crate::common::log;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn handler(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let line = format!(
        "➜ {} {} {} +{}",
        method,
        path,
        status.as_u16(),
        log::format_duration(started.elapsed())
    );
    if status.is_server_error() {
        log::warn(&line);
    } else {
        log::debug(&line);
    }
    response
}
