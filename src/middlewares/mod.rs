// src/middlewares/mod.rs

pub mod cors;
pub mod middleware;
pub mod panic;
pub mod request_log;
