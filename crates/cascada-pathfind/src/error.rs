//! Error types for the cascada-pathfind crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathfindError {
    /// Model validation, referential integrity, or rule set failures.
    #[error(transparent)]
    Core(#[from] cascada_core::CascadaError),

    #[error("Invalid parameter {name}: {value} (allowed range {min}..={max})")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid output format: {0}. Choose: json, text")]
    InvalidFormat(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PathfindError>;
