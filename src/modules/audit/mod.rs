// src/modules/audit/mod.rs

pub mod check_log;
