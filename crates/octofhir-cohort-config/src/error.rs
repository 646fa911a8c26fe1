//! Configuration loading errors
//!
//! All of these are fatal: a resolver is never constructed from a source
//! that failed to load. Lookup misses on a loaded configuration are not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration structure: {0}")]
    InvalidStructure(String),

    #[error("Unsupported configuration file: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
