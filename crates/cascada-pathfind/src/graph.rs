//! In-memory attack graph.
//!
//! Converts a validated `SystemModel` into a compact adjacency list. Nodes get
//! dense indices in entity declaration order and each adjacency list keeps
//! relationship declaration order, so every traversal over the graph is
//! deterministic for a given input.

use std::collections::HashMap;

use cascada_core::{CascadaError, EntityType, RelationshipType, SystemModel};

/// Node metadata stored in the graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Position of the entity in the model's declaration order.
    pub index: usize,
    /// Entity ID from the system model.
    pub id: String,
    pub entity_type: EntityType,
}

/// Outgoing edge in the adjacency list.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub relationship_type: RelationshipType,
    /// Target node index.
    pub target_index: usize,
}

/// The directed attack graph, read-only once built.
#[derive(Debug)]
pub struct AttackGraph {
    /// Nodes in entity declaration order.
    pub nodes: Vec<GraphNode>,
    /// Outgoing edges of node `i`, in relationship declaration order.
    pub adjacency: Vec<Vec<GraphEdge>>,
    /// Resolves an entity ID to its node position.
    pub node_index: HashMap<String, usize>,
}

impl AttackGraph {
    /// Build the graph from a system model: one node per entity, one edge
    /// per relationship.
    ///
    /// Fails with `ReferentialIntegrity` if a relationship names an entity
    /// that is not part of the model.
    pub fn build(system: &SystemModel) -> Result<Self, CascadaError> {
        let mut node_index = HashMap::with_capacity(system.entities.len());
        let mut nodes = Vec::with_capacity(system.entities.len());

        for (i, entity) in system.entities.iter().enumerate() {
            if node_index.insert(entity.id.clone(), i).is_some() {
                return Err(CascadaError::Validation(format!(
                    "Duplicate entity ID detected: {}",
                    entity.id
                )));
            }
            nodes.push(GraphNode {
                index: i,
                id: entity.id.clone(),
                entity_type: entity.entity_type,
            });
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];

        for rel in &system.relationships {
            let lookup = |id: &str| {
                node_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| CascadaError::ReferentialIntegrity {
                        source_id: rel.source.clone(),
                        target_id: rel.target.clone(),
                        missing: id.to_string(),
                    })
            };
            let src_idx = lookup(&rel.source)?;
            let tgt_idx = lookup(&rel.target)?;

            adjacency[src_idx].push(GraphEdge {
                relationship_type: rel.relationship_type,
                target_index: tgt_idx,
            });
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = system.relationships.len(),
            "Attack graph built"
        );

        Ok(Self {
            nodes,
            adjacency,
            node_index,
        })
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn entity_type(&self, index: usize) -> Option<EntityType> {
        self.nodes.get(index).map(|n| n.entity_type)
    }

    /// Distinct successors of `index`, in first-insertion order.
    ///
    /// Parallel relationships to the same entity yield the successor once.
    pub fn successors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let edges = self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[]);
        edges
            .iter()
            .enumerate()
            .filter(move |(pos, edge)| {
                !edges[..*pos]
                    .iter()
                    .any(|earlier| earlier.target_index == edge.target_index)
            })
            .map(|(_, edge)| edge.target_index)
    }

    /// Map entity IDs to node indices, preserving order.
    ///
    /// IDs not present in the graph are skipped with a warning.
    pub fn resolve(&self, ids: &[String]) -> Vec<usize> {
        ids.iter()
            .filter_map(|id| {
                let idx = self.index_of(id);
                if idx.is_none() {
                    tracing::warn!(entity_id = %id, "Unknown entity ignored");
                }
                idx
            })
            .collect()
    }

    /// Entity count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Relationship count, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascada_core::{Entity, Relationship};

    fn model(entities: &[(&str, EntityType)], rels: &[(&str, &str, RelationshipType)]) -> SystemModel {
        SystemModel {
            entities: entities
                .iter()
                .map(|(id, t)| Entity::new(*id, *t))
                .collect(),
            relationships: rels
                .iter()
                .map(|(s, t, r)| Relationship::new(*s, *t, *r))
                .collect(),
            entry_points: vec![],
            targets: vec![],
        }
    }

    #[test]
    fn test_build_basic() {
        let system = model(
            &[
                ("internet", EntityType::External),
                ("web", EntityType::Service),
                ("db", EntityType::Data),
            ],
            &[
                ("internet", "web", RelationshipType::CanAccess),
                ("web", "db", RelationshipType::ConnectedTo),
            ],
        );

        let graph = AttackGraph::build(&system).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.adjacency[0].len(), 1);
        assert_eq!(graph.adjacency[1].len(), 1);
        assert_eq!(graph.adjacency[2].len(), 0);
        assert_eq!(
            graph.adjacency[1][0].relationship_type,
            RelationshipType::ConnectedTo
        );
    }

    #[test]
    fn test_node_types_queryable() {
        let system = model(
            &[("r", EntityType::Role), ("d", EntityType::Data)],
            &[],
        );
        let graph = AttackGraph::build(&system).unwrap();

        assert_eq!(graph.entity_type(0), Some(EntityType::Role));
        assert_eq!(graph.entity_type(1), Some(EntityType::Data));
        assert_eq!(graph.entity_type(2), None);
        assert_eq!(graph.node(1).unwrap().id, "d");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let system = model(
            &[
                ("hub", EntityType::Network),
                ("c", EntityType::Compute),
                ("a", EntityType::Compute),
                ("b", EntityType::Compute),
            ],
            &[
                ("hub", "b", RelationshipType::ConnectedTo),
                ("hub", "c", RelationshipType::ConnectedTo),
                ("hub", "a", RelationshipType::ConnectedTo),
            ],
        );
        let graph = AttackGraph::build(&system).unwrap();

        assert_eq!(graph.index_of("c"), Some(1));
        let succ: Vec<&str> = graph
            .successors(0)
            .map(|i| graph.nodes[i].id.as_str())
            .collect();
        assert_eq!(succ, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_parallel_edges_kept_but_successor_listed_once() {
        let system = model(
            &[("u", EntityType::Identity), ("r", EntityType::Role)],
            &[
                ("u", "r", RelationshipType::Assumes),
                ("u", "r", RelationshipType::Trusts),
            ],
        );
        let graph = AttackGraph::build(&system).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_dangling_relationship_is_integrity_error() {
        let system = model(
            &[("n1", EntityType::Compute)],
            &[("n1", "n_missing", RelationshipType::RunsOn)],
        );

        match AttackGraph::build(&system) {
            Err(CascadaError::ReferentialIntegrity {
                source_id,
                target_id,
                missing,
            }) => {
                assert_eq!(source_id, "n1");
                assert_eq!(target_id, "n_missing");
                assert_eq!(missing, "n_missing");
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let system = model(
            &[("x", EntityType::Compute), ("x", EntityType::Data)],
            &[],
        );
        assert!(matches!(
            AttackGraph::build(&system),
            Err(CascadaError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_skips_unknown() {
        let system = model(
            &[("alpha", EntityType::Compute), ("beta", EntityType::Service)],
            &[],
        );
        let graph = AttackGraph::build(&system).unwrap();

        let ids = vec!["beta".to_string(), "gamma".to_string(), "alpha".to_string()];
        assert_eq!(graph.resolve(&ids), vec![1, 0]);
        assert_eq!(graph.index_of("gamma"), None);
    }
}
