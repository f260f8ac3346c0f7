//! Entity-relationship diagrams for ORM data models.
//!
//! Build [`model::Entity`] descriptors in code or load them from YAML/JSON,
//! render them through Graphviz with [`diagram::generate_data_model_diagram`],
//! then make the SVG interactive with [`enhance::add_web_font_and_interactivity`].

pub mod config;
pub mod diagram;
pub mod enhance;
pub mod error;
pub mod json_schema;
pub mod model;

pub use diagram::{generate_data_model_diagram, DiagramOptions, GraphDocument, TargetPolicy};
pub use enhance::{add_web_font_and_interactivity, EnhanceOutcome};
pub use model::{Column, Entity, Model, Relationship};
