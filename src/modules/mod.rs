// src/modules/mod.rs

pub mod app;
pub mod audit;
pub mod axum;
pub mod router;
pub mod sheets;
pub mod whitelist;
