//! Error types for startup: configuration and font loading.
//!
//! The simulation itself has no error path; a missing font or a failed bell
//! only degrades what is shown or heard.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid hex color: {0} (expected RRGGBB, e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown shape: {0} (expected circle, heart, star, ring, chrysanthemum or text)")]
    UnknownShape(String),

    #[error("invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum FontError {
    #[error("could not read font {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse font {name}: {reason}")]
    Parse { name: String, reason: String },

    #[error("no usable font found")]
    NotFound,
}
