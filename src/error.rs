//! Configuration errors
//!
//! The simulation core itself never fails; only loading and validating a
//! configuration can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config JSON is malformed
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Config parsed but its values are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}
