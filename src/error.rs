//! Error types for Visor
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Visor operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, attachment preprocessing, and remote
/// completion requests.
#[derive(Error, Debug)]
pub enum VisorError {
    /// Configuration-related errors (missing credential, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Attachment preprocessing errors (unreadable file, size limit,
    /// undecodable text content)
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Remote request errors (network failure, non-success status,
    /// malformed or empty response body)
    #[error("Remote request error: {0}")]
    Remote(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Visor operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
