// src/core/response.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

// ISO-8601 with millisecond precision, e.g. 2025-01-31T08:15:00.123Z
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn envelope(success: bool, fields: Value) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(success));
    if let Value::Object(fields) = fields {
        body.extend(fields);
    }
    body
}

// 200 with {success: true, ..fields, timestamp}
pub fn success(fields: Value) -> Response {
    let mut body = envelope(true, fields);
    body.insert("timestamp".to_string(), Value::String(now_iso()));
    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

// 200 with {success: <ok>, ..fields}. Soft failures travel this way.
pub fn outcome(ok: bool, fields: Value) -> Response {
    (StatusCode::OK, Json(Value::Object(envelope(ok, fields)))).into_response()
}

// 4xx, 5xx
pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let mut body = envelope(false, Value::Null);
    body.insert("error".to_string(), Value::String(message.into()));
    body.insert("timestamp".to_string(), Value::String(now_iso()));
    (status, Json(Value::Object(body))).into_response()
}

// 404 Not Found
pub fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}

// 405 Method Not Allowed
pub fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

// 500 Internal Server Error
pub fn internal_error() -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
