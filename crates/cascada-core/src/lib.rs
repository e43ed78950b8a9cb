//! cascada-core: Domain model, rule sets, and error handling for Cascada.
//!
//! This crate provides the foundational types shared by the analyzer:
//! - Entity and relationship vocabularies for the system description
//! - The validated `SystemModel` and the path records produced from it
//! - Scoring rule sets and profile loading
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::RuleSet;
pub use error::{CascadaError, Result};
pub use types::{
    AttackPath, Entity, EntityType, PathMode, Relationship, RelationshipType, ScoredPath,
    SystemModel,
};
