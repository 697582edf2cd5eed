// src/middlewares/panic.rs

use crate::common::log;
use crate::core::response;
use axum::response::Response;
use std::any::Any;

// Used by CatchPanicLayer; the panic payload stays in the server log.
pub fn handle(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    log::error(&format!("✗ Handler panicked: {}", detail));
    response::internal_error()
}
