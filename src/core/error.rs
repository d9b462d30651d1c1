//! Failure modes of an export run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Environment '{name}' not found in {}", .path.display())]
    ConfigNotFound { name: String, path: PathBuf },

    #[error("Malformed environment file {} at line {line}: {reason}", .path.display())]
    ConfigMalformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Request error for symbol {symbol}: {source}")]
    Network {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for symbol: {symbol}. Response: '{body}'")]
    Api {
        symbol: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse price response for {symbol}: {reason}")]
    MalformedResponse { symbol: String, reason: String },

    #[error("Invalid price record #{index} for {symbol}: {reason}")]
    Transform {
        index: usize,
        symbol: String,
        reason: String,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ExportError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
