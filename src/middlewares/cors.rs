/* /src/middlewares/cors.rs */

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

// Allowed origins; "*" admits any, "*.example.com" admits subdomains.
pub type AllowedOrigins = Arc<Vec<String>>;

pub async fn handler(State(allowed): State<AllowedOrigins>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    // --- Preflight ---
    if req.method() == Method::OPTIONS {
        let mut response = (StatusCode::OK, ()).into_response();
        add_cors_headers(response.headers_mut(), &allowed, origin.as_deref());
        return response;
    }

    let mut response = next.run(req).await;
    add_cors_headers(response.headers_mut(), &allowed, origin.as_deref());
    response
}

fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|entry| {
        if entry == "*" {
            true
        } else if let Some(base) = entry.strip_prefix("*.") {
            origin.ends_with(&format!(".{}", base))
        } else {
            entry == origin
        }
    })
}

fn add_cors_headers(headers: &mut HeaderMap, allowed: &[String], origin: Option<&str>) {
    let wildcard = allowed.iter().any(|o| o == "*");
    match origin {
        Some(origin) if origin_allowed(allowed, origin) => {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                headers.insert(header::VARY, HeaderValue::from_static("Origin"));
            }
        }
        None if wildcard => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
        _ => {}
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept, Authorization"),
    );
}
