use thiserror::Error;

/// Top-level error type for Cascada.
#[derive(Error, Debug)]
pub enum CascadaError {
    /// The system description is malformed: unknown vocabulary, duplicate ids,
    /// or references to entities that do not exist.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(
        "Referential integrity error: relationship {source_id} -> {target_id} references unknown entity {missing}"
    )]
    ReferentialIntegrity {
        source_id: String,
        target_id: String,
        missing: String,
    },

    /// The scoring rule set is missing, incomplete, or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CascadaError>;
