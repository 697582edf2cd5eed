// src/main.rs

mod common;
mod core;
mod middlewares;
mod modules;

use common::env::CONFIG;
use common::log;
use std::process;

#[tokio::main]
async fn main() {
    common::env::load();
    log::init();
    core::bootstrap::init(&CONFIG);

    if let Err(e) = modules::axum::core::start(&CONFIG).await {
        log::error(&format!("✗ {}", e));
        if let Some(path) = log::get_log_path() {
            log::error(&format!("✗ The crash report can be found at {}", path.display()));
        }
        // Give the file writer a moment to flush.
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        process::exit(1);
    }
}
