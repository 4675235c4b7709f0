//! Error types for the cycle_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cycle_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An input date does not correspond to a real calendar day
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Dates are real but the profile cannot be projected
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

impl Error {
    /// True for the two projection failures a user can fix by re-entering data.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidDate(_) | Error::InvalidProfile(_))
    }
}
