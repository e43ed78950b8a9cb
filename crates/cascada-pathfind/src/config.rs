//! Configuration for the cascada analyzer.

use serde::Deserialize;

use cascada_core::PathMode;

use crate::error::{PathfindError, Result};
use crate::report::OutputFormat;
use crate::types::AnalysisRequest;

/// Upper bound accepted for `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 32;
/// Upper bound accepted for `max_paths`.
pub const MAX_PATHS_LIMIT: usize = 10_000;

/// Analyzer settings.
///
/// Loaded from the `[analysis]` section of `cascada.toml` or
/// `CASCADA_ANALYSIS__` environment variables; command-line flags override.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    #[serde(default)]
    pub path_mode: PathMode,

    /// Rule set profile name, resolved as `{profiles_dir}/{profile}.json`.
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: String,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_depth() -> usize {
    6
}

fn default_max_paths() -> usize {
    50
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_profiles_dir() -> String {
    "profiles".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_paths: default_max_paths(),
            path_mode: PathMode::default(),
            profile: default_profile(),
            profiles_dir: default_profiles_dir(),
            format: OutputFormat::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load from `{file_prefix}.toml` (optional) and the environment.
    ///
    /// A missing `[analysis]` section yields the defaults.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CASCADA_ANALYSIS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match cfg.get::<AnalysisConfig>("analysis") {
            Ok(c) => Ok(c),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reject limits outside the supported ranges.
    pub fn validate(&self) -> Result<()> {
        check_range("max_depth", self.max_depth, 1, MAX_DEPTH_LIMIT)?;
        check_range("max_paths", self.max_paths, 1, MAX_PATHS_LIMIT)?;
        Ok(())
    }

    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            profile: self.profile.clone(),
            max_depth: self.max_depth,
            max_paths: self.max_paths,
            path_mode: self.path_mode,
        }
    }
}

fn check_range(name: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PathfindError::InvalidParameter {
            name,
            value,
            min,
            max,
        })
    }
}
