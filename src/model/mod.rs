//! Entity descriptors for diagram generation.
//!
//! This module provides:
//! - Typed descriptors for entities, columns and relationships
//! - A builder API for constructing models in code
//! - Loading of YAML/JSON model files (see [`load_models`])
//! - Include/exclude filtering by glob pattern

mod loader;

pub use loader::*;

use glob::Pattern;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A column of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type, displayed verbatim (e.g. `VARCHAR(255)`, `Numeric(10, 2)`)
    #[serde(rename = "type")]
    pub col_type: String,
    /// Part of the primary key
    #[serde(default)]
    pub primary_key: bool,
    /// Has a uniqueness constraint
    #[serde(default)]
    pub unique: bool,
    /// Has an index
    #[serde(default)]
    pub index: bool,
    /// Referenced `table.column`, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            primary_key: false,
            unique: false,
            index: false,
            foreign_key: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.foreign_key = Some(target.into());
        self
    }

    /// Constraint markers in fixed precedence order: PK, Unique, Index
    pub fn constraints(&self) -> Vec<&'static str> {
        let mut constraints = Vec::with_capacity(3);
        if self.primary_key {
            constraints.push("PK");
        }
        if self.unique {
            constraints.push("Unique");
        }
        if self.index {
            constraints.push("Index");
        }
        constraints
    }

    /// Comma-joined constraint markers, empty when the column has none
    pub fn constraint_annotation(&self) -> String {
        self.constraints().join(",")
    }
}

/// A directed, named association from one entity to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RelationshipRepr", into = "RelationshipRepr")]
pub struct Relationship {
    /// Name of the related entity
    pub target: String,
    /// Relationship key, used as the edge label
    pub key: String,
}

impl Relationship {
    pub fn new(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
        }
    }
}

/// Serialized form of a relationship: either `"Target"` or `{target, key}`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum RelationshipRepr {
    Target(String),
    Full { target: String, key: String },
}

impl From<RelationshipRepr> for Relationship {
    fn from(repr: RelationshipRepr) -> Self {
        match repr {
            RelationshipRepr::Target(target) => {
                let key = target.to_lowercase();
                Relationship { target, key }
            }
            RelationshipRepr::Full { target, key } => Relationship { target, key },
        }
    }
}

impl From<Relationship> for RelationshipRepr {
    fn from(rel: Relationship) -> Self {
        RelationshipRepr::Full {
            target: rel.target,
            key: rel.key,
        }
    }
}

/// Schema shape of one table-like object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    /// Entity (class) name, used as the node id
    pub name: String,
    /// Columns in declared order
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Relationships in declared order
    #[serde(default)]
    #[schemars(with = "Vec<RelationshipRepr>")]
    pub relationships: Vec<Relationship>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn relationship(mut self, target: impl Into<String>, key: impl Into<String>) -> Self {
        self.relationships.push(Relationship::new(target, key));
        self
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} columns, {} relationships)",
            self.name,
            self.columns.len(),
            self.relationships.len()
        )
    }
}

/// An ordered collection of entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Model {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.entities.iter().map(|e| e.columns.len()).sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.entities.iter().map(|e| e.relationships.len()).sum()
    }

    /// Keep entities matching any include pattern (all, if none given)
    /// and none of the exclude patterns.
    pub fn retain_matching(&mut self, include: &[Pattern], exclude: &[Pattern]) {
        self.entities.retain(|entity| {
            let included = include.is_empty() || include.iter().any(|p| p.matches(&entity.name));
            let excluded = exclude.iter().any(|p| p.matches(&entity.name));
            included && !excluded
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_annotation_order() {
        let col = Column::new("email", "String").index().unique().primary_key();
        assert_eq!(col.constraint_annotation(), "PK,Unique,Index");
    }

    #[test]
    fn test_constraint_annotation_partial() {
        assert_eq!(Column::new("a", "Int").primary_key().constraint_annotation(), "PK");
        assert_eq!(
            Column::new("a", "Int").unique().index().constraint_annotation(),
            "Unique,Index"
        );
        assert_eq!(Column::new("a", "Int").constraint_annotation(), "");
    }

    #[test]
    fn test_relationship_shorthand_lowercases_key() {
        let rel: Relationship = serde_json::from_str("\"Customer\"").unwrap();
        assert_eq!(rel.target, "Customer");
        assert_eq!(rel.key, "customer");
    }

    #[test]
    fn test_retain_matching() {
        let mut model = Model::new(vec![
            Entity::new("GenericUser"),
            Entity::new("GenericAuditLog"),
            Entity::new("Customer"),
        ]);
        let include = vec![Pattern::new("Generic*").unwrap()];
        let exclude = vec![Pattern::new("*Log").unwrap()];
        model.retain_matching(&include, &exclude);

        let names: Vec<&str> = model.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["GenericUser"]);
    }
}
