//! CLI command implementations

pub mod extract;
pub mod global_filters;
