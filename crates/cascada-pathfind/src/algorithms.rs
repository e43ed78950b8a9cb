//! Bounded depth-first enumeration of attack paths.
//!
//! Every entry point is searched in the order given, sharing one result
//! accumulator so that `max_paths` caps the total across all of them. A node
//! already on the current path is never revisited, which together with the
//! depth bound guarantees termination on cyclic graphs.

use std::collections::HashSet;

use cascada_core::{AttackPath, PathMode};

use crate::graph::AttackGraph;

/// Limits applied to a path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of nodes in a path, entry and target included.
    pub max_depth: usize,
    /// Maximum number of paths returned across all entry points.
    pub max_paths: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_paths: 50,
        }
    }
}

/// A path through the graph as node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPath {
    pub node_indices: Vec<usize>,
}

impl RawPath {
    /// Map node indices back to entity IDs.
    pub fn to_attack_path(&self, graph: &AttackGraph) -> AttackPath {
        AttackPath(
            self.node_indices
                .iter()
                .filter_map(|&i| graph.node(i).map(|n| n.id.clone()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }
}

/// Enumerate simple paths from `entry_points` to any of `targets`.
///
/// Results are in depth-first pre-order per entry point, entry points in the
/// order given, successors in relationship declaration order. Degenerate
/// limits (`max_depth == 0` or `max_paths == 0`) yield no paths.
pub fn find_paths(
    graph: &AttackGraph,
    entry_points: &[usize],
    targets: &[usize],
    limits: SearchLimits,
    mode: PathMode,
) -> Vec<RawPath> {
    let mut ctx = SearchContext {
        graph,
        targets: targets.iter().copied().collect(),
        limits,
        mode,
        path: Vec::with_capacity(limits.max_depth.min(graph.node_count())),
        on_path: HashSet::new(),
        results: Vec::new(),
    };

    for &entry in entry_points {
        if ctx.is_full() {
            break;
        }
        if entry >= graph.node_count() {
            tracing::warn!(entry, "Entry point index out of range, skipped");
            continue;
        }

        ctx.path.push(entry);
        ctx.on_path.insert(entry);
        ctx.visit(entry);
        ctx.path.pop();
        ctx.on_path.remove(&entry);
    }

    tracing::debug!(
        entry_points = entry_points.len(),
        targets = targets.len(),
        max_depth = limits.max_depth,
        max_paths = limits.max_paths,
        mode = %mode,
        found = ctx.results.len(),
        "Path search complete"
    );

    ctx.results
}

/// State threaded through one search: the current path stack, its membership
/// set, and the result accumulator shared by every entry point.
struct SearchContext<'g> {
    graph: &'g AttackGraph,
    targets: HashSet<usize>,
    limits: SearchLimits,
    mode: PathMode,
    path: Vec<usize>,
    on_path: HashSet<usize>,
    results: Vec<RawPath>,
}

impl SearchContext<'_> {
    fn is_full(&self) -> bool {
        self.results.len() >= self.limits.max_paths
    }

    /// Visit `node`, which is already the last element of `self.path`.
    fn visit(&mut self, node: usize) {
        if self.is_full() {
            return;
        }
        if self.path.len() > self.limits.max_depth {
            return;
        }

        if self.targets.contains(&node) {
            self.results.push(RawPath {
                node_indices: self.path.clone(),
            });
            if self.mode == PathMode::FirstImpact {
                return;
            }
        }

        let graph = self.graph;
        for next in graph.successors(node) {
            if self.is_full() {
                return;
            }
            if self.on_path.contains(&next) {
                continue;
            }

            self.on_path.insert(next);
            self.path.push(next);

            self.visit(next);

            self.path.pop();
            self.on_path.remove(&next);
        }
    }
}
