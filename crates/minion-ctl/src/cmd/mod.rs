//! CLI command modules.

pub mod config;
pub mod job;
pub mod maintenance;
pub mod script;
pub mod uploads;
