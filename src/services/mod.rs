// src/services/mod.rs

pub mod attempts;
pub mod sessions;
