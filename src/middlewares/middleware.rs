// src/middlewares/middleware.rs

use crate::middlewares::{cors, panic, request_log};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

// Applies the application's global middleware stack to a router.

// Layers are applied from the inside out: the last `.layer()` call is the
// outermost and sees the request first.
// Request flow: CORS -> Request log -> Panic guard -> Router
pub fn stack(router: Router, cors_origins: Vec<String>) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic::handle))
        .layer(middleware::from_fn(request_log::handler))
        .layer(middleware::from_fn_with_state(Arc::new(cors_origins), cors::handler))
}
