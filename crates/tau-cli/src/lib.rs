//! CLI library components for `tau`.

pub mod commands;
pub mod logging;
pub mod types;
