//! Core domain types for the Cascada system description.
//!
//! A `SystemModel` is the declarative description of an infrastructure and
//! identity topology: typed entities, typed directed relationships, and the
//! entry points and targets an analysis runs between. Models are validated
//! once on construction and treated as immutable afterwards.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CascadaError, Result};

// ── Vocabulary ────────────────────────────────────────────────────

/// The kind of asset an entity represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Internet, VPC, subnet.
    Network,
    /// API, web application.
    Service,
    /// VM, worker, machine.
    Compute,
    /// User, service account.
    Identity,
    /// Database, object storage.
    Data,
    /// IAM role.
    Role,
    /// Internet-like entities outside the trust boundary.
    External,
}

impl EntityType {
    /// The complete entity vocabulary.
    pub const ALL: [EntityType; 7] = [
        Self::Network,
        Self::Service,
        Self::Compute,
        Self::Identity,
        Self::Data,
        Self::Role,
        Self::External,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Service => "service",
            Self::Compute => "compute",
            Self::Identity => "identity",
            Self::Data => "data",
            Self::Role => "role",
            Self::External => "external",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CascadaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CascadaError::Validation(format!("Unknown entity type: {s}")))
    }
}

/// The kind of directed relationship between two entities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    ConnectedTo,
    CanAccess,
    Trusts,
    Assumes,
    RunsOn,
}

impl RelationshipType {
    /// The complete relationship vocabulary.
    pub const ALL: [RelationshipType; 5] = [
        Self::ConnectedTo,
        Self::CanAccess,
        Self::Trusts,
        Self::Assumes,
        Self::RunsOn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectedTo => "connected_to",
            Self::CanAccess => "can_access",
            Self::Trusts => "trusts",
            Self::Assumes => "assumes",
            Self::RunsOn => "runs_on",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = CascadaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CascadaError::Validation(format!("Unknown relationship type: {s}")))
    }
}

/// Termination policy for path search.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PathMode {
    /// Stop extending a branch as soon as it reaches any target.
    #[default]
    FirstImpact,
    /// Keep exploring past a target; targets may appear mid-path.
    Full,
}

impl PathMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstImpact => "first_impact",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathMode {
    type Err = CascadaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_impact" => Ok(Self::FirstImpact),
            "full" => Ok(Self::Full),
            "privilege_dominant" => Err(CascadaError::Configuration(
                "Path mode privilege_dominant is reserved and not implemented".to_string(),
            )),
            _ => Err(CascadaError::Configuration(format!(
                "Invalid path mode: {s}. Choose: first_impact, full"
            ))),
        }
    }
}

impl TryFrom<String> for PathMode {
    type Error = CascadaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ── Entities and Relationships ────────────────────────────────────

/// One node of the topology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl Entity {
    pub fn new(id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            entity_type,
        }
    }
}

/// One directed edge of the topology. Uses `from`/`to` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    #[serde(rename = "from")]
    pub source: String,
    #[serde(rename = "to")]
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship_type,
        }
    }
}

// ── System Model ──────────────────────────────────────────────────

/// Unvalidated wire form of a system description.
///
/// Types are kept as plain strings so that vocabulary violations surface as
/// validation errors with the offending value, not as parse errors.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSystemModel {
    pub entities: Vec<RawEntity>,
    pub relationships: Vec<RawRelationship>,
    pub entry_points: Vec<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
}

/// The complete, validated description of the system under review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawSystemModel")]
pub struct SystemModel {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub entry_points: Vec<String>,
    pub targets: Vec<String>,
}

impl SystemModel {
    /// Parse and validate a system description from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawSystemModel = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Read, parse, and validate a system description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            entities = model.entities.len(),
            relationships = model.relationships.len(),
            "System model loaded"
        );
        Ok(model)
    }

    /// Check entity uniqueness and that every relationship endpoint, entry
    /// point, and target names an existing entity.
    pub fn validate(&self) -> Result<()> {
        let ids = unique_entity_ids(&self.entities)?;

        for rel in &self.relationships {
            if !ids.contains(rel.source.as_str()) {
                return Err(CascadaError::Validation(format!(
                    "Relationship 'from' references unknown entity: {}",
                    rel.source
                )));
            }
            if !ids.contains(rel.target.as_str()) {
                return Err(CascadaError::Validation(format!(
                    "Relationship 'to' references unknown entity: {}",
                    rel.target
                )));
            }
        }

        for id in &self.entry_points {
            if !ids.contains(id.as_str()) {
                return Err(CascadaError::Validation(format!(
                    "Entry point references unknown entity: {id}"
                )));
            }
        }

        for id in &self.targets {
            if !ids.contains(id.as_str()) {
                return Err(CascadaError::Validation(format!(
                    "Target references unknown entity: {id}"
                )));
            }
        }

        Ok(())
    }
}

/// Collect entity IDs, failing on the first one declared twice.
fn unique_entity_ids(entities: &[Entity]) -> Result<HashSet<&str>> {
    let mut ids = HashSet::with_capacity(entities.len());
    for entity in entities {
        if !ids.insert(entity.id.as_str()) {
            return Err(CascadaError::Validation(format!(
                "Duplicate entity ID detected: {}",
                entity.id
            )));
        }
    }
    Ok(ids)
}

impl TryFrom<RawSystemModel> for SystemModel {
    type Error = CascadaError;

    fn try_from(raw: RawSystemModel) -> Result<Self> {
        let entities = raw
            .entities
            .into_iter()
            .map(|e| {
                Ok(Entity {
                    entity_type: e.entity_type.parse()?,
                    id: e.id,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        // Duplicate IDs are reported ahead of relationship vocabulary errors.
        unique_entity_ids(&entities)?;

        let relationships = raw
            .relationships
            .into_iter()
            .map(|r| {
                Ok(Relationship {
                    relationship_type: r.relationship_type.parse()?,
                    source: r.from,
                    target: r.to,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let model = Self {
            entities,
            relationships,
            entry_points: raw.entry_points,
            targets: raw.targets,
        };
        model.validate()?;
        Ok(model)
    }
}

// ── Attack Path Types ─────────────────────────────────────────────

/// A simple path of entity IDs from an entry point to a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackPath(pub Vec<String>);

impl AttackPath {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entry(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl fmt::Display for AttackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

/// An attack path with its risk score and the reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPath {
    pub path: AttackPath,
    pub risk_score: u32,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "entities": [
            {"id": "internet", "type": "external"},
            {"id": "web_app", "type": "service"},
            {"id": "role_x", "type": "role"},
            {"id": "customer_db", "type": "data"}
        ],
        "relationships": [
            {"from": "internet", "to": "web_app", "type": "can_access"},
            {"from": "web_app", "to": "role_x", "type": "assumes"},
            {"from": "role_x", "to": "customer_db", "type": "can_access"}
        ],
        "entry_points": ["internet"],
        "targets": ["customer_db"]
    }"#;

    fn sample_with(patch: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        patch(&mut value);
        value.to_string()
    }

    fn validation_message(json: &str) -> String {
        match SystemModel::from_json_str(json) {
            Err(CascadaError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn parses_valid_model() {
        let model = SystemModel::from_json_str(SAMPLE).unwrap();
        assert_eq!(model.entities.len(), 4);
        assert_eq!(model.relationships[1].source, "web_app");
        assert_eq!(model.relationships[1].target, "role_x");
        assert_eq!(
            model.relationships[1].relationship_type,
            RelationshipType::Assumes
        );
        assert_eq!(model.entities[2].entity_type, EntityType::Role);
    }

    #[test]
    fn relationship_serializes_with_wire_keys() {
        let rel = Relationship::new("a", "b", RelationshipType::RunsOn);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from": "a", "to": "b", "type": "runs_on"})
        );
    }

    #[test]
    fn deserialize_validates_through_raw_form() {
        let ok: SystemModel = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(ok.targets, vec!["customer_db"]);

        let bad = sample_with(|v| v["targets"] = serde_json::json!(["ghost"]));
        assert!(serde_json::from_str::<SystemModel>(&bad).is_err());
    }

    #[test]
    fn rejects_unknown_entity_type() {
        let json = sample_with(|v| v["entities"][1]["type"] = "mainframe".into());
        assert_eq!(validation_message(&json), "Unknown entity type: mainframe");
    }

    #[test]
    fn rejects_unknown_relationship_type() {
        let json = sample_with(|v| v["relationships"][0]["type"] = "pings".into());
        assert_eq!(validation_message(&json), "Unknown relationship type: pings");
    }

    #[test]
    fn rejects_duplicate_entity_ids() {
        let json = sample_with(|v| v["entities"][2]["id"] = "web_app".into());
        assert!(validation_message(&json).starts_with("Duplicate entity ID"));
    }

    #[test]
    fn duplicate_ids_reported_before_relationship_types() {
        let json = sample_with(|v| {
            v["entities"][1]["id"] = "internet".into();
            v["relationships"][0]["type"] = "pings".into();
        });
        assert_eq!(
            validation_message(&json),
            "Duplicate entity ID detected: internet"
        );
    }

    #[test]
    fn entity_types_reported_before_duplicate_ids() {
        let json = sample_with(|v| {
            v["entities"][1]["id"] = "internet".into();
            v["entities"][3]["type"] = "mainframe".into();
        });
        assert_eq!(validation_message(&json), "Unknown entity type: mainframe");
    }

    #[test]
    fn rejects_dangling_relationship_endpoints() {
        let json = sample_with(|v| v["relationships"][0]["from"] = "nowhere".into());
        assert_eq!(
            validation_message(&json),
            "Relationship 'from' references unknown entity: nowhere"
        );

        let json = sample_with(|v| v["relationships"][2]["to"] = "nowhere".into());
        assert_eq!(
            validation_message(&json),
            "Relationship 'to' references unknown entity: nowhere"
        );
    }

    #[test]
    fn rejects_unknown_entry_points_and_targets() {
        let json = sample_with(|v| v["entry_points"] = serde_json::json!(["vpn"]));
        assert_eq!(
            validation_message(&json),
            "Entry point references unknown entity: vpn"
        );

        let json = sample_with(|v| v["targets"] = serde_json::json!(["customer_db", "vault"]));
        assert_eq!(validation_message(&json), "Target references unknown entity: vault");
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let result = SystemModel::from_json_str(r#"{"entities": []}"#);
        assert!(matches!(result, Err(CascadaError::Serialization(_))));
    }

    #[test]
    fn validate_catches_programmatic_models() {
        let model = SystemModel {
            entities: vec![Entity::new("a", EntityType::Compute)],
            relationships: vec![Relationship::new("a", "b", RelationshipType::ConnectedTo)],
            entry_points: vec!["a".to_string()],
            targets: vec![],
        };
        assert!(matches!(model.validate(), Err(CascadaError::Validation(_))));
    }

    #[test]
    fn vocabulary_round_trips_through_strings() {
        for t in EntityType::ALL {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), t);
        }
        for t in RelationshipType::ALL {
            assert_eq!(t.as_str().parse::<RelationshipType>().unwrap(), t);
        }
    }

    #[test]
    fn path_mode_parsing() {
        assert_eq!("first_impact".parse::<PathMode>().unwrap(), PathMode::FirstImpact);
        assert_eq!("first-impact".parse::<PathMode>().unwrap(), PathMode::FirstImpact);
        assert_eq!("FULL".parse::<PathMode>().unwrap(), PathMode::Full);

        let err = "privilege_dominant".parse::<PathMode>().unwrap_err();
        assert!(err.to_string().contains("reserved"));
        assert!("widest".parse::<PathMode>().is_err());

        let json = serde_json::to_string(&PathMode::FirstImpact).unwrap();
        assert_eq!(json, "\"first_impact\"");
        let mode: PathMode = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(mode, PathMode::Full);
    }

    #[test]
    fn attack_path_display_and_accessors() {
        let path = AttackPath(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(path.to_string(), "a -> b -> c");
        assert_eq!(path.entry(), Some("a"));
        assert_eq!(path.len(), 3);
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["a","b","c"]"#);
    }
}
