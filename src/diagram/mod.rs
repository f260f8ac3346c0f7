//! Data model diagram generation.
//!
//! This module provides:
//! - A transient graph document built from entity descriptors
//! - Graphviz DOT serialization with HTML-like table labels
//! - Rendering through the external `dot` binary, optionally opening a viewer

mod dot;
mod render;

pub use dot::{escape_dot_id, escape_html, to_dot};
pub use render::{open_in_viewer, render_with_graphviz, RenderFormat, GRAPHVIZ_PROGRAM};

use crate::error::DiagramError;
use crate::model::{Column, Entity};
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How to treat relationships whose target is not among the supplied entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetPolicy {
    /// Emit the edge anyway; Graphviz draws a bare node for the target
    #[default]
    Permissive,
    /// Fail before anything is written
    Strict,
}

impl FromStr for TargetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(TargetPolicy::Permissive),
            "strict" => Ok(TargetPolicy::Strict),
            _ => Err(format!(
                "Unknown target policy: {}. Valid options: permissive, strict",
                s
            )),
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPolicy::Permissive => write!(f, "permissive"),
            TargetPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Colors, fonts and layout attributes of the generated graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub bgcolor: String,
    pub rankdir: String,
    pub splines: String,
    pub node_fontname: String,
    pub node_fontsize: u32,
    pub edge_fontname: String,
    pub edge_fontsize: u32,
    pub edge_color: String,
    pub edge_style: String,
    pub header_color: String,
    pub row_color: String,
    pub url_template: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bgcolor: "#EEEEEE".to_string(),
            rankdir: "TB".to_string(),
            splines: "spline".to_string(),
            node_fontname: "Roboto".to_string(),
            node_fontsize: 12,
            edge_fontname: "Roboto".to_string(),
            edge_fontsize: 10,
            edge_color: "#1E88E5".to_string(),
            edge_style: "dashed".to_string(),
            header_color: "#3F51B5".to_string(),
            row_color: "#BBDEFB".to_string(),
            url_template: "http://{name}_details.html".to_string(),
        }
    }
}

impl Theme {
    pub fn node_url(&self, name: &str) -> String {
        self.url_template.replace("{name}", name)
    }
}

/// Options for [`generate_data_model_diagram`]
#[derive(Debug, Clone)]
pub struct DiagramOptions {
    /// Draw relationship keys as edge labels
    pub add_labels: bool,
    /// Open the rendered file in the platform viewer
    pub view_diagram: bool,
    pub format: RenderFormat,
    pub target_policy: TargetPolicy,
    pub theme: Theme,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            add_labels: true,
            view_diagram: true,
            format: RenderFormat::Svg,
            target_policy: TargetPolicy::Permissive,
            theme: Theme::default(),
        }
    }
}

/// A table-shaped node, one per entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    /// HTML-like label markup, without the enclosing `<` `>`
    pub label: String,
    pub url: String,
}

/// A directed edge, one per relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub tooltip: String,
    pub color: String,
    pub style: String,
}

/// Logical graph handed to the renderer
#[derive(Debug, Clone)]
pub struct GraphDocument {
    pub comment: String,
    pub graph_attrs: Vec<(String, String)>,
    pub node_attrs: Vec<(String, String)>,
    pub edge_attrs: Vec<(String, String)>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    /// Build the graph for `entities` in input order
    pub fn from_entities(
        entities: &[Entity],
        options: &DiagramOptions,
    ) -> Result<Self, DiagramError> {
        if options.target_policy == TargetPolicy::Strict {
            check_targets(entities)?;
        }

        let theme = &options.theme;
        let mut nodes = Vec::with_capacity(entities.len());
        let mut edges = Vec::new();

        for entity in entities {
            nodes.push(GraphNode {
                id: entity.name.clone(),
                label: table_label(entity, theme),
                url: theme.node_url(&entity.name),
            });

            for rel in &entity.relationships {
                edges.push(GraphEdge {
                    from: entity.name.clone(),
                    to: rel.target.clone(),
                    label: options.add_labels.then(|| rel.key.clone()),
                    tooltip: format!("Relation between {} and {}", entity.name, rel.target),
                    color: theme.edge_color.clone(),
                    style: theme.edge_style.clone(),
                });
            }
        }

        Ok(Self {
            comment: "Interactive Data Models".to_string(),
            graph_attrs: attrs(&[
                ("bgcolor", theme.bgcolor.clone()),
                ("rankdir", theme.rankdir.clone()),
                ("splines", theme.splines.clone()),
            ]),
            node_attrs: attrs(&[
                ("shape", "none".to_string()),
                ("fontsize", theme.node_fontsize.to_string()),
                ("fontname", theme.node_fontname.clone()),
            ]),
            edge_attrs: attrs(&[
                ("fontsize", theme.edge_fontsize.to_string()),
                ("fontname", theme.edge_fontname.clone()),
            ]),
            nodes,
            edges,
        })
    }

    pub fn edges_from<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == node)
    }
}

fn attrs(pairs: &[(&str, String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn check_targets(entities: &[Entity]) -> Result<(), DiagramError> {
    let known: AHashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
    for entity in entities {
        for rel in &entity.relationships {
            if !known.contains(rel.target.as_str()) {
                return Err(DiagramError::UnknownTarget {
                    entity: entity.name.clone(),
                    target: rel.target.clone(),
                    key: rel.key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// HTML-like table label: a header row with the entity name, then one row per column
fn table_label(entity: &Entity, theme: &Theme) -> String {
    let mut html = String::new();

    html.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">");
    html.push_str(&format!(
        "<TR><TD COLSPAN=\"2\" BGCOLOR=\"{}\"><FONT COLOR=\"white\">{}</FONT></TD></TR>",
        escape_html(&theme.header_color),
        escape_html(&entity.name)
    ));

    for col in &entity.columns {
        html.push_str(&column_row(col, &theme.row_color));
    }

    html.push_str("</TABLE>");
    html
}

fn column_row(col: &Column, color: &str) -> String {
    let color = escape_html(color);
    let tooltip = col
        .foreign_key
        .as_ref()
        .map(|target| format!(" TITLE=\"references {}\"", escape_html(target)))
        .unwrap_or_default();
    format!(
        "<TR><TD BGCOLOR=\"{}\"{}>{}</TD><TD BGCOLOR=\"{}\">{} ({})</TD></TR>",
        color,
        tooltip,
        escape_html(&col.name),
        color,
        escape_html(&col.col_type),
        col.constraint_annotation()
    )
}

/// Write the DOT source to `output_file`, render it to `output_file.<ext>`,
/// and optionally open the result. Returns the rendered file path.
pub fn generate_data_model_diagram(
    entities: &[Entity],
    output_file: &Path,
    options: &DiagramOptions,
) -> Result<PathBuf, DiagramError> {
    let document = GraphDocument::from_entities(entities, options)?;
    let source = to_dot(&document);

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_file, source)?;

    let rendered = options.format.output_path(output_file);
    render_with_graphviz(GRAPHVIZ_PROGRAM, output_file, &rendered, options.format)?;

    if options.view_diagram {
        open_in_viewer(&rendered);
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_parent_child_with_labels() {
        let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();

        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);
        let edge = &doc.edges[0];
        assert_eq!(edge.from, "B");
        assert_eq!(edge.to, "A");
        assert_eq!(edge.label.as_deref(), Some("parent"));
        assert_eq!(edge.tooltip, "Relation between B and A");
    }

    #[test]
    fn test_parent_child_without_labels() {
        let options = DiagramOptions {
            add_labels: false,
            ..Default::default()
        };
        let doc = GraphDocument::from_entities(&parent_child(), &options).unwrap();

        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].label, None);
    }

    #[test]
    fn test_entity_without_relationships_has_no_edges() {
        let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();
        assert_eq!(doc.edges_from("A").count(), 0);
        assert_eq!(doc.nodes.iter().filter(|n| n.id == "A").count(), 1);
    }

    #[test]
    fn test_label_rows_match_columns() {
        let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();
        assert_eq!(doc.nodes[0].label.matches("<TR>").count(), 2);
        assert_eq!(doc.nodes[1].label.matches("<TR>").count(), 3);
    }

    #[test]
    fn test_label_constraint_cell() {
        let entities = vec![Entity::new("User")
            .column(Column::new("email", "VARCHAR").primary_key().unique().index())
            .column(Column::new("bio", "TEXT"))];
        let doc = GraphDocument::from_entities(&entities, &DiagramOptions::default()).unwrap();
        let label = &doc.nodes[0].label;

        assert!(label.contains(">VARCHAR (PK,Unique,Index)</TD>"));
        assert!(label.contains(">TEXT ()</TD>"));
        assert!(label.contains("<FONT COLOR=\"white\">User</FONT>"));
    }

    #[test]
    fn test_label_escapes_markup() {
        let entities = vec![Entity::new("Doc").column(Column::new("body", "Map<String, Any>"))];
        let doc = GraphDocument::from_entities(&entities, &DiagramOptions::default()).unwrap();
        assert!(doc.nodes[0].label.contains("Map&lt;String, Any&gt; ()"));
    }

    #[test]
    fn test_foreign_key_hint_is_tooltip_only() {
        let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();
        let label = &doc.nodes[1].label;
        assert!(label.contains("TITLE=\"references a.id\">a_id</TD>"));
        assert!(label.contains(">INTEGER ()</TD>"));
    }

    #[test]
    fn test_node_url() {
        let doc = GraphDocument::from_entities(&parent_child(), &DiagramOptions::default()).unwrap();
        assert_eq!(doc.nodes[1].url, "http://B_details.html");
    }

    #[test]
    fn test_permissive_keeps_dangling_edge() {
        let entities = vec![Entity::new("Order").relationship("Customer", "customer")];
        let doc = GraphDocument::from_entities(&entities, &DiagramOptions::default()).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.edges[0].to, "Customer");
    }

    #[test]
    fn test_strict_rejects_dangling_edge() {
        let entities = vec![Entity::new("Order").relationship("Customer", "customer")];
        let options = DiagramOptions {
            target_policy: TargetPolicy::Strict,
            ..Default::default()
        };
        let err = GraphDocument::from_entities(&entities, &options).unwrap_err();
        match err {
            DiagramError::UnknownTarget {
                entity,
                target,
                key,
            } => {
                assert_eq!(entity, "Order");
                assert_eq!(target, "Customer");
                assert_eq!(key, "customer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_target_policy_from_str() {
        assert_eq!("STRICT".parse::<TargetPolicy>(), Ok(TargetPolicy::Strict));
        assert_eq!(
            "permissive".parse::<TargetPolicy>(),
            Ok(TargetPolicy::Permissive)
        );
        assert!("lenient".parse::<TargetPolicy>().is_err());
    }
}
