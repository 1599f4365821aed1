//! Error types for rskdm.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rskdm operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An explicit binary path was given but nothing exists there.
    #[error("{binary} not found at {}", .path.display())]
    BinaryNotFound { binary: String, path: PathBuf },

    /// PATH lookup for the binary came back empty.
    #[error("{0} not found in PATH.")]
    BinaryNotInPath(String),

    /// A caller-supplied input path does not exist.
    #[error("{what} not found: {}", .path.display())]
    InputNotFound { what: &'static str, path: PathBuf },

    /// The timestamp is neither `YYYY-MM-DD HH:MM` nor `YYYY-MM-DD`.
    #[error("Invalid datetime format: {0}. Use YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDateTime(String),

    /// The KDM type token is not one of the known formulations.
    #[error("Invalid KDM type: {0}")]
    InvalidKdmType(String),

    /// The process could not be started at all.
    #[error("{label} failed: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// An output directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited non-zero.
    #[error("{label} failed (exit code {code}):\n{stderr}")]
    ToolFailure {
        label: String,
        code: i32,
        stderr: String,
    },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external binary could not be resolved.
    Configuration,
    /// Caller input was rejected before anything was spawned.
    Precondition,
    /// The operating system refused to start the tool or prepare its output.
    Execution,
    /// The tool itself reported failure.
    ToolFailure,
}

impl Error {
    /// Which of the four failure classes this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BinaryNotFound { .. } | Error::BinaryNotInPath(_) => ErrorKind::Configuration,
            Error::InputNotFound { .. } | Error::InvalidDateTime(_) | Error::InvalidKdmType(_) => {
                ErrorKind::Precondition
            }
            Error::Spawn { .. } | Error::CreateDir { .. } => ErrorKind::Execution,
            Error::ToolFailure { .. } => ErrorKind::ToolFailure,
        }
    }
}

/// Result type alias for rskdm operations.
pub type Result<T> = std::result::Result<T, Error>;
