//! cascada-pathfind: Attack path analysis over a declared system topology.
//!
//! Builds an in-memory attack graph from a validated system model, enumerates
//! bounded simple paths from entry points to targets, and scores each path
//! against a profile's rule set. Runs are stateless: nothing is kept between
//! calls.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
pub mod scoring;
pub mod types;

pub use error::PathfindError;
pub use types::{AnalysisReport, AnalysisRequest, GraphStats};

use cascada_core::{RuleSet, ScoredPath, SystemModel};

use crate::graph::AttackGraph;
use crate::scoring::RiskScorer;

/// Runs the model → graph → paths → scored paths pipeline.
pub struct AnalysisEngine {
    scorer: RiskScorer,
}

impl AnalysisEngine {
    /// Create an engine scoring with the given rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            scorer: RiskScorer::new(rules),
        }
    }

    /// Analyze a system model.
    ///
    /// Validates the model, builds the attack graph, searches for paths
    /// within the request's limits, then scores and ranks them. Degenerate
    /// limits produce an empty report rather than an error.
    pub fn analyze(
        &self,
        system: &SystemModel,
        request: &AnalysisRequest,
    ) -> error::Result<AnalysisReport> {
        let start = std::time::Instant::now();

        system.validate()?;
        let graph = AttackGraph::build(system)?;

        let entry_points = graph.resolve(&system.entry_points);
        let targets = graph.resolve(&system.targets);
        let graph_stats = GraphStats {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            entry_point_count: entry_points.len(),
            target_count: targets.len(),
        };
        tracing::debug!(
            nodes = graph_stats.total_nodes,
            edges = graph_stats.total_edges,
            entry_points = graph_stats.entry_point_count,
            targets = graph_stats.target_count,
            "Attack graph built"
        );

        let raw_paths = algorithms::find_paths(
            &graph,
            &entry_points,
            &targets,
            request.limits(),
            request.path_mode,
        );

        let scored: Vec<ScoredPath> = raw_paths
            .iter()
            .map(|rp| self.scorer.score_path(rp, &graph))
            .collect();
        let paths = scoring::rank_paths(scored);
        let results_hash = hash_paths(&paths)?;

        let computation_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let top_risk = paths.first().map(|p| p.risk_score).unwrap_or(0);

        tracing::info!(
            profile = %request.profile,
            mode = %request.path_mode,
            paths = paths.len(),
            top_risk,
            computation_ms,
            results_hash = %results_hash,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            profile: request.profile.clone(),
            path_mode: request.path_mode,
            max_depth: request.max_depth,
            max_paths: request.max_paths,
            graph_stats,
            paths,
            results_hash,
        })
    }
}

/// BLAKE3 hex digest of the serialized path records.
fn hash_paths(paths: &[ScoredPath]) -> error::Result<String> {
    let json = serde_json::to_vec(paths)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}
