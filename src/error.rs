//! Error type for loading keyword vocabularies
//!
//! Network and table failures have their own enums in
//! [`crate::utils::error`]; the binary wraps everything in `anyhow`.

use std::io;
use thiserror::Error;

/// Errors raised while reading, parsing or validating a vocabulary
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the crate Error type
pub type Result<T> = std::result::Result<T, Error>;
