//! Schema command: print JSON Schema for the input file formats.

use anyhow::{bail, Result};
use model_diagram::json_schema::{all_schemas, get_schema, schema_names};

pub fn run(name: Option<String>, list: bool) -> Result<()> {
    if list {
        for name in schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let output = match name {
        Some(name) => match get_schema(&name) {
            Some(schema) => serde_json::to_string_pretty(&schema)?,
            None => bail!(
                "Unknown schema: {}. Valid options: {}",
                name,
                schema_names().join(", ")
            ),
        },
        None => serde_json::to_string_pretty(&all_schemas())?,
    };

    println!("{}", output);
    Ok(())
}
