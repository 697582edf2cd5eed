// src/modules/sheets/mod.rs

pub mod auth;
pub mod client;
