//! Error types for ty2ini-edit

use thiserror::Error;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Bad pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{operation} failed: {message}")]
    Toolchain {
        operation: &'static str,
        message: String,
    },

    #[error("No {0} command configured")]
    NotConfigured(&'static str),
}
