//! Error types for ossup-core
//!
//! Provides a unified error type that can be converted to the process exit code.

use thiserror::Error;

/// Result type alias for ossup-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ossup operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local path or URL-list file missing or malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Project configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote fetch or credential endpoint failure
    #[error("Network error: {0}")]
    Network(String),

    /// Credential payload could not be normalized
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// A put operation failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Prompt input rejected by a validator
    #[error("{0}")]
    Validation(String),

    /// Terminal prompt could not be shown or was aborted
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the process exit code for this error
    ///
    /// Only input errors change the exit status. Failures during the upload
    /// run itself are reported on the terminal and the process exits with 0.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Config(_) | Error::TomlParse(_) | Error::Prompt(_) => 1,
            _ => 0,
        }
    }
}
