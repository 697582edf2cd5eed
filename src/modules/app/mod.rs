// src/modules/app/mod.rs

pub mod root;
