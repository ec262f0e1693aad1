//! CLI command implementations

pub mod utils;

pub mod browse;
pub mod completions;
pub mod config;
pub mod form;
pub mod list;
pub mod show;
pub mod validate;
