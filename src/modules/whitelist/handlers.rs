// src/modules/whitelist/handlers.rs

use crate::core::error::AppResult;
use crate::core::response;
use crate::modules::whitelist::service::{AddOutcome, RemoveOutcome, WhitelistService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub address: Option<String>,
    pub owner: Option<String>,
    pub added_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveRequest {
    pub address: Option<String>,
}

// An unreadable body carries none of the required fields.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    body.map(|Json(b)| b).unwrap_or_default()
}

pub async fn check_handler(
    State(service): State<Arc<WhitelistService>>,
    Path(address): Path<String>,
) -> AppResult<Response> {
    let result = service.check(&address).await?;
    Ok(response::success(json!({
        "whitelisted": result.whitelisted,
        "server": result.server,
    })))
}

pub async fn list_handler(State(service): State<Arc<WhitelistService>>) -> AppResult<Response> {
    let servers = service.list().await?;
    Ok(response::success(json!({
        "count": servers.len(),
        "servers": servers,
    })))
}

pub async fn add_handler(
    State(service): State<Arc<WhitelistService>>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> AppResult<Response> {
    let req = body_or_default(body);
    let outcome = service.add(req.address, req.owner, req.added_by).await?;
    Ok(match outcome {
        AddOutcome::Added(server) => response::outcome(
            true,
            json!({ "message": "Server added to whitelist", "server": server }),
        ),
        AddOutcome::AlreadyExists => response::outcome(
            false,
            json!({ "message": "Server already exists in whitelist" }),
        ),
    })
}

pub async fn remove_handler(
    State(service): State<Arc<WhitelistService>>,
    body: Result<Json<RemoveRequest>, JsonRejection>,
) -> AppResult<Response> {
    let req = body_or_default(body);
    let outcome = service.remove(req.address).await?;
    Ok(match outcome {
        RemoveOutcome::Removed(server) => response::outcome(
            true,
            json!({ "message": "Server removed from whitelist", "server": server }),
        ),
        RemoveOutcome::NotFound => response::outcome(
            false,
            json!({ "message": "Server not found in whitelist" }),
        ),
    })
}
