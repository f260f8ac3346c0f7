//! Library-level tests for diagram generation from entity descriptors.

use model_diagram::config::DiagramConfig;
use model_diagram::diagram::{
    generate_data_model_diagram, to_dot, DiagramOptions, GraphDocument, TargetPolicy,
};
use model_diagram::error::DiagramError;
use model_diagram::model::{load_models, Column, Entity};
use std::path::Path;
use tempfile::TempDir;

fn demo_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/saas_billing.yaml")
}

fn parent_child() -> Vec<Entity> {
    vec![
        Entity::new("A").column(Column::new("id", "INTEGER").primary_key()),
        Entity::new("B")
            .column(Column::new("id", "INTEGER").primary_key())
            .column(Column::new("a_id", "INTEGER").references("a.id"))
            .relationship("A", "parent"),
    ]
}

#[test]
fn test_parent_child_dot_with_labels() {
    let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();
    let dot = to_dot(&doc);

    assert_eq!(dot.matches("[label=<").count(), 2);
    assert_eq!(dot.matches(" -> ").count(), 1);
    assert!(dot.contains("  B -> A [label=\"parent\", "));
}

#[test]
fn test_parent_child_dot_without_labels() {
    let options = DiagramOptions {
        add_labels: false,
        ..Default::default()
    };
    let doc = GraphDocument::from_entities(&parent_child(), &options).unwrap();
    let dot = to_dot(&doc);

    assert_eq!(dot.matches(" -> ").count(), 1);
    assert!(dot.contains("  B -> A [tooltip=\"Relation between B and A\""));
    assert!(!dot.contains("label=\"parent\""));
}

#[test]
fn test_demo_model_is_self_consistent() {
    let model = load_models(&demo_path()).unwrap();
    assert_eq!(model.entities.len(), 15);

    let options = DiagramOptions {
        target_policy: TargetPolicy::Strict,
        ..Default::default()
    };
    let doc = GraphDocument::from_entities(&model.entities, &options).unwrap();
    assert_eq!(doc.nodes.len(), 15);
    assert_eq!(doc.edges.len(), model.relationship_count());

    let user = doc.nodes.iter().find(|n| n.id == "GenericUser").unwrap();
    assert!(user.label.contains(">VARCHAR (PK,Index)</TD>"));
    assert!(user.label.contains(">VARCHAR (Unique)</TD>"));
}

#[test]
fn test_demo_theme_config() {
    let config = DiagramConfig::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/theme.yaml"))
        .unwrap();
    let mut options = DiagramOptions::default();
    config.apply(&mut options);

    let doc = GraphDocument::from_entities(&parent_child(), &options).unwrap();
    let dot = to_dot(&doc);
    assert!(dot.contains("rankdir=\"LR\""));
    assert!(dot.contains("BGCOLOR=\"#263238\""));
    assert!(dot.contains("URL=\"https://docs.example.com/models/A.html\""));
    assert!(dot.contains("color=\"#E53935\""));
    assert_eq!(options.target_policy, TargetPolicy::Strict);
}

#[test]
fn test_strict_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("diagram");
    let entities = vec![Entity::new("Order").relationship("Customer", "customer")];
    let options = DiagramOptions {
        target_policy: TargetPolicy::Strict,
        view_diagram: false,
        ..Default::default()
    };

    let err = generate_data_model_diagram(&entities, &output, &options).unwrap_err();
    assert!(matches!(err, DiagramError::UnknownTarget { .. }));
    assert!(!output.exists());
    assert!(!dir.path().join("diagram.svg").exists());
}
