//! Typed errors for the probe.
//!
//! Every variant is fatal: the probe reports it as UNKNOWN and exits 3.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the counter file.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("could not read counter file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("counter file {} holds {len} bytes, expected 8", .path.display())]
    Length { path: PathBuf, len: usize },

    #[error("could not write counter file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not remove counter file {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("hit total overflows: {hits} + {prior}")]
    Overflow { hits: i64, prior: i64 },
}

/// Errors that abort a probe run before a verdict is reached.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Could not initialize elasticsearch client: {0}")]
    ClientInit(#[from] elastic_client::ElasticError),

    #[error("Could not read CA certificate {}: {source}", .path.display())]
    CaCertificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open query file {}: {source}", .path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not retrieve data from elasticsearch: {0:#}")]
    Search(anyhow::Error),

    #[error("Could not unmarshal search data: {0}")]
    Decode(String),

    #[error("Could not use counter file: {0}")]
    CounterRead(#[source] CounterError),

    #[error("Could not persist counter file: {0}")]
    CounterWrite(#[source] CounterError),
}

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
