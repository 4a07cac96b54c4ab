//! Error types for the vacancy harvester
//!
//! This module defines custom error types used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Still rate limited after the configured number of retries
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Body could not be parsed as the expected JSON shape
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Body parsed but carried no vacancy content
    #[error("Empty record")]
    EmptyRecord,
}

impl FetchError {
    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::ServerError(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors that can occur while loading or writing delimited tables
#[derive(Error, Debug)]
pub enum TableError {
    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row
    #[error("Table has no header row")]
    MissingHeader,

    /// Every parse strategy failed
    #[error("Could not read {path} (tried: {})", attempts.join(", "))]
    Unreadable { path: PathBuf, attempts: Vec<String> },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
