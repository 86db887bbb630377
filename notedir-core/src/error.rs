//! Error types for the notedir ecosystem.

use thiserror::Error;

/// Errors that can occur in notedir operations.
#[derive(Error, Debug)]
pub enum NotedirError {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Template '{0}' could not be read: {1}")]
    TemplateRead(String, String),

    #[error("Failed to create note '{0}': {1}")]
    Creation(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for notedir operations.
pub type NotedirResult<T> = Result<T, NotedirError>;
