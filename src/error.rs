//! Errors reported while rendering styled text.

use std::{fmt, io};

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering to a console.
///
/// Malformed escape sequences are never errors; they degrade to no-ops.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to format styled text")]
    Format(#[from] fmt::Error),

    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
}
