//! Post-processing of rendered SVG diagrams.
//!
//! Adds a web font import and rewrites Graphviz `node`/`edge` classes into
//! hover-friendly ones, so a stylesheet can target e.g. every edge touching
//! a given table with `.edge-from-Customer, .edge-to-Customer`.

mod svg;

use crate::error::EnhanceError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Default stylesheet imported into the enhanced SVG
pub const DEFAULT_FONT_IMPORT_URL: &str =
    "https://fonts.googleapis.com/css?family=Roboto:400,400i,700,700i";

/// Class given to every table node
pub const NODE_HOVER_CLASS: &str = "table-hover";

/// Placeholder for an edge endpoint that cannot be determined
pub const UNKNOWN_ENDPOINT: &str = "None";

/// Graphviz edge titles look like `Customer->GenericUser` (or `a--b` undirected)
static EDGE_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s*-[->]\s*(.+?)\s*$").unwrap());

/// Characters that would split a class token
static CLASS_TOKEN_UNSAFE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone)]
pub struct EnhanceOptions {
    pub font_import_url: String,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            font_import_url: DEFAULT_FONT_IMPORT_URL.to_string(),
        }
    }
}

impl EnhanceOptions {
    fn style_text(&self) -> String {
        format!("@import url(\"{}\");", self.font_import_url)
    }
}

/// Result of [`add_web_font_and_interactivity`]. Only `Written` produced a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceOutcome {
    Written(PathBuf),
    MissingInput,
    Unreadable(String),
    ParseError(String),
    WriteError(String),
}

impl EnhanceOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, EnhanceOutcome::Written(_))
    }
}

/// Enhance `input` into `output` with the default options
pub fn add_web_font_and_interactivity(input: &Path, output: &Path) -> EnhanceOutcome {
    enhance_svg_file(input, output, &EnhanceOptions::default())
}

/// Enhance `input` into `output`. Never fails: problems are logged and
/// reported through the outcome, and nothing is written unless the whole
/// transform succeeded.
pub fn enhance_svg_file(input: &Path, output: &Path, options: &EnhanceOptions) -> EnhanceOutcome {
    if !input.exists() {
        error!("{} does not exist", input.display());
        return EnhanceOutcome::MissingInput;
    }

    let source = match fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to read {}: {}", input.display(), e);
            return EnhanceOutcome::Unreadable(e.to_string());
        }
    };

    let enhanced = match enhance_svg(&source, options) {
        Ok(s) => s,
        Err(EnhanceError::Parse(msg)) => {
            error!("error parsing SVG {}: {}", input.display(), msg);
            return EnhanceOutcome::ParseError(msg);
        }
    };

    if let Err(e) = fs::write(output, enhanced) {
        error!("failed to write {}: {}", output.display(), e);
        return EnhanceOutcome::WriteError(e.to_string());
    }

    EnhanceOutcome::Written(output.to_path_buf())
}

/// In-memory transform: parse, inject the font style, rewrite classes and
/// pretty-print with an XML declaration.
pub fn enhance_svg(source: &str, options: &EnhanceOptions) -> Result<String, EnhanceError> {
    let parse_options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(source, parse_options)
        .map_err(|e| EnhanceError::Parse(e.to_string()))?;

    Ok(svg::write_document(
        &doc,
        svg::doctype(source, &doc),
        &options.style_text(),
        rewrite_class,
    ))
}

/// New class for an element, or `None` to keep the attribute as is
fn rewrite_class(node: roxmltree::Node<'_, '_>) -> Option<String> {
    let original = node.attribute("class")?;
    let mut class = original.to_string();

    if class.contains("node") {
        class = NODE_HOVER_CLASS.to_string();
    }
    if class.contains("edge") {
        let (source, target) = edge_endpoints(node);
        class = format!(
            "edge-hover edge-from-{} edge-to-{}",
            class_token(&source),
            class_token(&target)
        );
    }

    (class != original).then_some(class)
}

/// Endpoints from explicit `source`/`target` attributes, else from the
/// Graphviz `<title>` child.
fn edge_endpoints(node: roxmltree::Node<'_, '_>) -> (String, String) {
    let from_title = node
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "title")
        .and_then(|t| t.text())
        .and_then(|text| {
            EDGE_TITLE_RE
                .captures(text)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        });

    let source = node
        .attribute("source")
        .map(str::to_string)
        .or_else(|| from_title.as_ref().map(|(s, _)| s.clone()))
        .unwrap_or_else(|| UNKNOWN_ENDPOINT.to_string());
    let target = node
        .attribute("target")
        .map(str::to_string)
        .or_else(|| from_title.map(|(_, t)| t))
        .unwrap_or_else(|| UNKNOWN_ENDPOINT.to_string());

    (source, target)
}

fn class_token(name: &str) -> String {
    CLASS_TOKEN_UNSAFE_RE.replace_all(name, "_").into_owned()
}
