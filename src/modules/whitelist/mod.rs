// src/modules/whitelist/mod.rs

pub mod handlers;
pub mod record;
pub mod service;
pub mod store;
