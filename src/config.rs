//! YAML configuration for diagram styling and behaviour.
//!
//! Every field is optional; anything left out keeps the built-in default.
//!
//! ```yaml
//! graph:
//!   bgcolor: "#FFFFFF"
//!   rankdir: LR
//! edge:
//!   color: "#E53935"
//! table:
//!   header_color: "#263238"
//! add_labels: false
//! target_policy: strict
//! ```

use crate::diagram::{DiagramOptions, TargetPolicy};
use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Graph-level attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphSection {
    pub bgcolor: Option<String>,
    pub rankdir: Option<String>,
    pub splines: Option<String>,
}

/// Font settings shared by node and edge defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NodeSection {
    pub fontname: Option<String>,
    pub fontsize: Option<u32>,
}

/// Edge defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeSection {
    pub fontname: Option<String>,
    pub fontsize: Option<u32>,
    pub color: Option<String>,
    pub style: Option<String>,
}

/// Table label colors
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TableSection {
    pub header_color: Option<String>,
    pub row_color: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiagramConfig {
    pub graph: GraphSection,
    pub node: NodeSection,
    pub edge: EdgeSection,
    pub table: TableSection,
    /// Node hyperlink template, `{name}` is replaced by the entity name
    pub url_template: Option<String>,
    pub add_labels: Option<bool>,
    pub target_policy: Option<TargetPolicy>,
    /// Stylesheet imported by the SVG enhancer
    pub font_import_url: Option<String>,
}

impl DiagramConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay the configured values onto `options`
    pub fn apply(&self, options: &mut DiagramOptions) {
        let theme = &mut options.theme;

        set(&mut theme.bgcolor, &self.graph.bgcolor);
        set(&mut theme.rankdir, &self.graph.rankdir);
        set(&mut theme.splines, &self.graph.splines);

        set(&mut theme.node_fontname, &self.node.fontname);
        set(&mut theme.node_fontsize, &self.node.fontsize);

        set(&mut theme.edge_fontname, &self.edge.fontname);
        set(&mut theme.edge_fontsize, &self.edge.fontsize);
        set(&mut theme.edge_color, &self.edge.color);
        set(&mut theme.edge_style, &self.edge.style);

        set(&mut theme.header_color, &self.table.header_color);
        set(&mut theme.row_color, &self.table.row_color);
        set(&mut theme.url_template, &self.url_template);

        set(&mut options.add_labels, &self.add_labels);
        set(&mut options.target_policy, &self.target_policy);
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml = r##"
graph:
  rankdir: LR
edge:
  color: "#E53935"
target_policy: strict
"##;
        let config: DiagramConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let mut options = DiagramOptions::default();
        config.apply(&mut options);

        assert_eq!(options.theme.rankdir, "LR");
        assert_eq!(options.theme.edge_color, "#E53935");
        assert_eq!(options.theme.bgcolor, "#EEEEEE");
        assert_eq!(options.theme.node_fontname, "Roboto");
        assert_eq!(options.target_policy, TargetPolicy::Strict);
        assert!(options.add_labels);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "add_labels: false\nurl_template: \"https://docs/{{name}}\"").unwrap();

        let config = DiagramConfig::load(file.path()).unwrap();
        assert_eq!(config.add_labels, Some(false));
        assert_eq!(config.url_template.as_deref(), Some("https://docs/{name}"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "graph: [unclosed").unwrap();
        assert!(matches!(
            DiagramConfig::load(file.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
