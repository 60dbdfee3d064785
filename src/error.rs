//! Error types for Rolodex
//!
//! Everything past startup degrades; only endpoint/terminal problems are
//! allowed to abort the program.

use thiserror::Error;

/// Main error type for Rolodex operations
#[derive(Error, Debug)]
pub enum RolodexError {
    #[error("Invalid directory endpoint '{0}': {1}")]
    InvalidEndpoint(String, url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Directory request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Directory responded with status {status} for '{query}'")]
    Status { status: u16, query: String },

    #[error("Malformed directory response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for Rolodex operations
pub type Result<T> = std::result::Result<T, RolodexError>;

impl RolodexError {
    /// Check if this error may degrade to an empty result list
    /// (fetch-boundary failures never surface past the worker).
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            RolodexError::Transport(_)
                | RolodexError::Status { .. }
                | RolodexError::Decode(_)
        )
    }
}
