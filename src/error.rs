//! Centralized error types for the sync core
//!
//! All fatal errors are represented by the `SurfaceError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, SurfaceError>`.
//!
//! Transient link failures (connect refused, read/write errors, EOF) are not
//! represented here: the link manager recovers from them internally and they
//! never escape to callers.

use std::fmt;
use std::path::PathBuf;

/// All fatal sync-core errors
#[derive(Debug)]
pub enum SurfaceError {
    // === Config ===
    /// Failed to read a config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse a config file
    ConfigParse { path: PathBuf, reason: String },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. } | Self::Runtime { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

/// Alias for Result with SurfaceError
pub type Result<T> = std::result::Result<T, SurfaceError>;
