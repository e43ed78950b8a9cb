//! Request and response types for an analysis run.

use serde::{Deserialize, Serialize};

use cascada_core::{PathMode, ScoredPath};

use crate::algorithms::SearchLimits;

/// Parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Name of the rule set profile the engine was configured with.
    pub profile: String,
    /// Maximum nodes per path (default: 6).
    pub max_depth: usize,
    /// Maximum number of paths across all entry points (default: 50).
    pub max_paths: usize,
    pub path_mode: PathMode,
}

impl AnalysisRequest {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
            max_paths: self.max_paths,
        }
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            profile: "default".to_string(),
            max_depth: limits.max_depth,
            max_paths: limits.max_paths,
            path_mode: PathMode::default(),
        }
    }
}

/// Complete result of an analysis run.
///
/// Contains no timestamps or generated IDs: the same model, rule set and
/// parameters always serialize to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub profile: String,
    pub path_mode: PathMode,
    pub max_depth: usize,
    pub max_paths: usize,
    pub graph_stats: GraphStats,
    /// Scored paths, highest risk first.
    pub paths: Vec<ScoredPath>,
    /// BLAKE3 hex digest of the serialized `paths`.
    pub results_hash: String,
}

/// Statistics about the attack graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub entry_point_count: usize,
    pub target_count: usize,
}
