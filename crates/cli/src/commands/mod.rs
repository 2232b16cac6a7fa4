//! Subcommand implementations.

pub mod config;
pub mod preview;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Writing to stdout failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
