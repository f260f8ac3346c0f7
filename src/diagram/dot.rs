//! Graphviz DOT serialization of a [`GraphDocument`].

use super::{GraphDocument, GraphEdge, GraphNode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Bare DOT identifier: letters, `_` and non-ASCII, not starting with a digit
static DOT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$").unwrap()
});

/// DOT numeral such as `42`, `-1.5` or `.5`
static DOT_NUMERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\.[0-9]+|[0-9]+(\.[0-9]*)?)$").unwrap());

/// Reserved words, matched case-insensitively by Graphviz
const DOT_KEYWORDS: &[&str] = &["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Generate DOT source for the document
pub fn to_dot(doc: &GraphDocument) -> String {
    let mut output = String::new();

    if !doc.comment.is_empty() {
        output.push_str(&format!("// {}\n", doc.comment));
    }
    output.push_str("digraph {\n");

    write_defaults(&mut output, "graph", &doc.graph_attrs);
    write_defaults(&mut output, "node", &doc.node_attrs);
    write_defaults(&mut output, "edge", &doc.edge_attrs);

    if !doc.nodes.is_empty() {
        output.push('\n');
    }
    for node in &doc.nodes {
        output.push_str(&node_statement(node));
    }

    if !doc.edges.is_empty() {
        output.push('\n');
    }
    for edge in &doc.edges {
        output.push_str(&edge_statement(edge));
    }

    output.push_str("}\n");
    output
}

fn write_defaults(output: &mut String, kind: &str, attrs: &[(String, String)]) {
    if attrs.is_empty() {
        return;
    }
    let list: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{}={}", k, quote(v)))
        .collect();
    output.push_str(&format!("  {} [{}];\n", kind, list.join(", ")));
}

fn node_statement(node: &GraphNode) -> String {
    format!(
        "  {} [label=<{}>, URL={}];\n",
        escape_dot_id(&node.id),
        node.label,
        quote(&node.url)
    )
}

fn edge_statement(edge: &GraphEdge) -> String {
    let mut attrs = Vec::with_capacity(4);
    if let Some(ref label) = edge.label {
        attrs.push(format!("label={}", quote(label)));
    }
    attrs.push(format!("tooltip={}", quote(&edge.tooltip)));
    attrs.push(format!("color={}", quote(&edge.color)));
    attrs.push(format!("style={}", quote(&edge.style)));

    format!(
        "  {} -> {} [{}];\n",
        escape_dot_id(&edge.from),
        escape_dot_id(&edge.to),
        attrs.join(", ")
    )
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape a string for use in DOT HTML labels
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node ID
pub fn escape_dot_id(s: &str) -> String {
    let keyword = DOT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s));
    if !keyword && (DOT_ID_RE.is_match(s) || DOT_NUMERAL_RE.is_match(s)) {
        s.to_string()
    } else {
        quote(s)
    }
}
