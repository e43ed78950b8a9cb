//! Scoring rule sets and profile loading.
//!
//! A profile is a JSON file holding one `RuleSet`. Every rule must be present
//! and fully specified; unknown keys, missing keys, and wrong types are
//! rejected at load time so that scoring never runs against a partial
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CascadaError, Result};

/// A named profile's scoring rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Free-form note about what the profile is tuned for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weights: RuleWeights,
}

/// The four canonical rules, evaluated in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleWeights {
    pub path_length: PathLengthRule,
    pub external_entry: BonusRule,
    pub privilege_escalation: BonusRule,
    pub sensitive_target: BonusRule,
}

/// Contributes `max(0, base - len(path))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathLengthRule {
    pub enabled: bool,
    pub base: u32,
}

/// Contributes a fixed `score` when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BonusRule {
    pub enabled: bool,
    pub score: u32,
}

impl RuleSet {
    /// The reference profile: base 10, external 20, role 30, data 40.
    pub fn reference() -> Self {
        Self {
            description: None,
            weights: RuleWeights {
                path_length: PathLengthRule {
                    enabled: true,
                    base: 10,
                },
                external_entry: BonusRule {
                    enabled: true,
                    score: 20,
                },
                privilege_escalation: BonusRule {
                    enabled: true,
                    score: 30,
                },
                sensitive_target: BonusRule {
                    enabled: true,
                    score: 40,
                },
            },
        }
    }

    /// Parse a rule set from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CascadaError::Configuration(format!("Invalid rule set: {e}")))
    }

    /// Read and parse a rule set file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CascadaError::Configuration(format!(
                "Cannot read rule set {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }
}

/// Load the profile `name` from `{dir}/{name}.json`.
pub fn load_profile(dir: impl AsRef<Path>, name: &str) -> Result<RuleSet> {
    if !is_valid_profile_name(name) {
        return Err(CascadaError::Configuration(format!(
            "Invalid profile name: {name:?}. Use letters, digits, '-' and '_'"
        )));
    }

    let path = dir.as_ref().join(format!("{name}.json"));
    let rules = RuleSet::load(&path)?;
    tracing::debug!(profile = name, path = %path.display(), "Rule set loaded");
    Ok(rules)
}

fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
