// src/core/error.rs

use crate::common::log;
use crate::core::response;
use crate::modules::whitelist::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("whitelist store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("failed to save whitelist: {0}")]
    SaveFailed(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingFields(_) => {
                log::info(&format!("▪ 400 {}", self));
                response::error(StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Store(_) => {
                log::error(&format!("✗ {}", self));
                response::error(StatusCode::INTERNAL_SERVER_ERROR, "Whitelist store unavailable")
            }
            AppError::SaveFailed(_) => {
                log::error(&format!("✗ {}", self));
                response::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save whitelist")
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
