//! Invitation page — startup error types.

use invitation_core::error::PageError;
use thiserror::Error;

/// Errors that stop the driver before or while it runs.
///
/// Controller failures never surface here; the runtime logs them and keeps
/// going.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The page manifest or an event line is not valid JSON.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The manifest describes a tree the document cannot hold.
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Reading the manifest or standard input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
