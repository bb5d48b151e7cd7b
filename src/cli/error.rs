//! CLI-specific error types

use crate::batch::BatchError;
use crate::config::ConfigError;
use crate::export::ExportError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a missing catalog root
pub const EXIT_INPUT_NOT_FOUND: i32 = 2;

/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Catalog root not found: {0}")]
    InputNotFound(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Batch error: {0}")]
    BatchError(#[from] BatchError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InputNotFound(_) | CliError::BatchError(BatchError::RootNotFound(_)) => {
                EXIT_INPUT_NOT_FOUND
            }
            _ => EXIT_FAILURE,
        }
    }
}
