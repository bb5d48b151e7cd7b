//! CLI command test modules

#[cfg(feature = "cli")]
pub mod extract_tests;
#[cfg(feature = "cli")]
pub mod global_filters_tests;
