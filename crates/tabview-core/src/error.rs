//! Error types for tabview

use thiserror::Error;

/// Core error type for tabview operations
#[derive(Error, Debug)]
pub enum TabviewError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for tabview operations
pub type Result<T> = std::result::Result<T, TabviewError>;
