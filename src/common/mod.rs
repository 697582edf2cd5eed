// src/common/mod.rs

pub mod env;
pub mod log;
