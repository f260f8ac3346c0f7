//! JSON Schema generation for input file formats.
//!
//! Schemas are generated using the schemars crate and can be exported via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns the JSON schemas of every file format the tool reads.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // --config file
    schemas.insert("config", schema_for!(crate::config::DiagramConfig));

    // model files passed to `generate`
    schemas.insert("model", schema_for!(crate::model::Model));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
