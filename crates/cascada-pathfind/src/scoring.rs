//! Rule-driven risk scoring for attack paths.
//!
//! Rules are evaluated in a fixed order and each triggered, enabled rule adds
//! its contribution to the score and one reason string:
//!
//! | Rule | Trigger | Contribution |
//! |---|---|---|
//! | path_length | always | `max(0, base - len(path))` |
//! | external_entry | first node is `external` | fixed bonus |
//! | privilege_escalation | any node is a `role` | fixed bonus, once |
//! | sensitive_target | last node is `data` | fixed bonus |

use cascada_core::config::RuleSet;
use cascada_core::{EntityType, ScoredPath};

use crate::algorithms::RawPath;
use crate::graph::AttackGraph;

pub const REASON_EXTERNAL_ENTRY: &str = "Externally reachable entry point";
pub const REASON_PRIVILEGE_ESCALATION: &str = "Privilege escalation via role access";
pub const REASON_SENSITIVE_TARGET: &str = "Sensitive data asset reached";

/// Scores paths against one profile's rule set.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    rules: RuleSet,
}

impl RiskScorer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Score a path. Pure: depends only on the path, the graph's node types,
    /// and the rule set.
    pub fn score_path(&self, path: &RawPath, graph: &AttackGraph) -> ScoredPath {
        let weights = &self.rules.weights;
        let type_at = |i: usize| graph.entity_type(i);

        let mut score: u32 = 0;
        let mut reasons = Vec::new();

        if weights.path_length.enabled {
            let len = u32::try_from(path.len()).unwrap_or(u32::MAX);
            score = score.saturating_add(weights.path_length.base.saturating_sub(len));
            reasons.push(format!("Path length = {}", path.len()));
        }

        let entry_type = path.node_indices.first().and_then(|&i| type_at(i));
        if weights.external_entry.enabled && entry_type == Some(EntityType::External) {
            score = score.saturating_add(weights.external_entry.score);
            reasons.push(REASON_EXTERNAL_ENTRY.to_string());
        }

        let has_role = path
            .node_indices
            .iter()
            .any(|&i| type_at(i) == Some(EntityType::Role));
        if weights.privilege_escalation.enabled && has_role {
            score = score.saturating_add(weights.privilege_escalation.score);
            reasons.push(REASON_PRIVILEGE_ESCALATION.to_string());
        }

        let target_type = path.node_indices.last().and_then(|&i| type_at(i));
        if weights.sensitive_target.enabled && target_type == Some(EntityType::Data) {
            score = score.saturating_add(weights.sensitive_target.score);
            reasons.push(REASON_SENSITIVE_TARGET.to_string());
        }

        ScoredPath {
            path: path.to_attack_path(graph),
            risk_score: score,
            reasons,
        }
    }
}

/// Sort scored paths by risk descending. Stable: ties keep their order.
pub fn rank_paths(mut paths: Vec<ScoredPath>) -> Vec<ScoredPath> {
    paths.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    paths
}
