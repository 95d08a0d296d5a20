//! Session and collaborator errors.

use thiserror::Error;

/// Errors raised by workspace collaborators.
///
/// Sessions turn these into reply text; they are never returned from
/// message handling.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File to create is already present.
    #[error("File '{0}' already exists.")]
    AlreadyExists(String),

    /// File to delete is missing.
    #[error("File '{0}' was not found.")]
    NotFound(String),

    /// Path resolves outside the workspace root.
    #[error("'{0}' is outside the workspace.")]
    OutsideWorkspace(String),

    /// Workspace root is missing or not a directory.
    #[error("No workspace folder is open at '{0}'.")]
    NoWorkspace(String),

    /// A git command exited unsuccessfully.
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    /// A terminal command could not be started.
    #[error("Failed to run command: {0}")]
    Terminal(String),

    /// Panel message (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
