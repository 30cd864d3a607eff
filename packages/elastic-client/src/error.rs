//! Error types for the Elasticsearch client.

use thiserror::Error;

/// Result type for Elasticsearch client operations.
pub type Result<T> = std::result::Result<T, ElasticError>;

/// Elasticsearch client errors.
#[derive(Debug, Error)]
pub enum ElasticError {
    /// Configuration error (conflicting settings, bad address, bad cloud id)
    #[error("configuration error: {0}")]
    Config(String),

    /// CA certificate could not be parsed or installed
    #[error("invalid CA certificate: {0}")]
    Certificate(#[source] reqwest::Error),

    /// Network error (connection refused, TLS failure, body read failure)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the cluster
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}
