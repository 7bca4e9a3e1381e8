//! Error types for boomkaart.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in boomkaart operations.
#[derive(Error, Debug)]
pub enum BoomkaartError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// API returned an error status
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid response structure
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Tree record validation failed
    #[error("Invalid tree data: {0}")]
    Validation(String),

    /// Session token storage failed
    #[error("Session store error: {0}")]
    Session(#[from] std::io::Error),

    /// No stored session and no token was provided
    #[error("not logged in: no session token found (run `boomkaart login` or pass --token)")]
    NoSession,
}
