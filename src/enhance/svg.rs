//! Pretty-printing XML writer over a parsed `roxmltree` document.
//!
//! `roxmltree` is read-only, so the enhancer writes a new document while
//! walking the old one: the style element is emitted as the first child of
//! the root, and every element's `class` passes through a rewrite hook.
//!
//! Layout rules: two-space indentation, whitespace-only text dropped,
//! elements holding real text written inline with their content untouched.

use roxmltree::{Document, Node, NodeType};

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>";
const XML_NS_URI: &str = "http://www.w3.org/XML/1998/namespace";
const INDENT: &str = "  ";

/// The source's `<!DOCTYPE ...>` if it has no internal subset. Only the
/// prolog before the root element is searched.
pub(super) fn doctype<'a>(source: &'a str, doc: &Document<'_>) -> Option<&'a str> {
    let prolog = source.get(..doc.root_element().range().start)?;
    let mut rest = prolog;
    while let Some(start) = rest.find("<!") {
        let tail = &rest[start..];
        if tail.starts_with("<!--") {
            let end = tail.find("-->")?;
            rest = &tail[end + 3..];
            continue;
        }
        if !tail.starts_with("<!DOCTYPE") {
            return None;
        }
        let len = tail.find('>')?;
        let decl = &tail[..=len];
        return (!decl.contains('[')).then_some(decl);
    }
    None
}

pub(super) fn write_document<F>(
    doc: &Document<'_>,
    doctype: Option<&str>,
    style_text: &str,
    rewrite_class: F,
) -> String
where
    F: Fn(Node<'_, '_>) -> Option<String>,
{
    let mut writer = Writer {
        out: String::new(),
        rewrite_class: &rewrite_class,
    };

    writer.out.push_str(XML_DECLARATION);
    writer.out.push('\n');
    if let Some(decl) = doctype {
        writer.out.push_str(decl);
        writer.out.push('\n');
    }

    for child in doc.root().children() {
        if child.is_element() {
            writer.element(child, 0, Some(style_text));
        } else {
            writer.misc(child);
        }
        writer.out.push('\n');
    }

    writer.out
}

struct Writer<'f, F> {
    out: String,
    rewrite_class: &'f F,
}

impl<F> Writer<'_, F>
where
    F: Fn(Node<'_, '_>) -> Option<String>,
{
    /// Write an element starting at the current position. `style` is only
    /// passed for the root element.
    fn element(&mut self, node: Node<'_, '_>, depth: usize, style: Option<&str>) {
        let name = qualified_element_name(node);
        self.out.push('<');
        self.out.push_str(&name);
        self.namespace_declarations(node);
        self.attributes(node);

        let mixed = has_text_content(node);
        let children: Vec<Node<'_, '_>> = node
            .children()
            .filter(|c| mixed || !is_blank_text(*c))
            .collect();

        if children.is_empty() && style.is_none() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        if mixed {
            if let Some(text) = style {
                self.style_element(text);
            }
            for child in children {
                self.inline(child);
            }
        } else {
            if let Some(text) = style {
                self.newline(depth + 1);
                self.style_element(text);
            }
            for child in children {
                self.newline(depth + 1);
                if child.is_element() {
                    self.element(child, depth + 1, None);
                } else {
                    self.misc(child);
                }
            }
            self.newline(depth);
        }

        self.out.push_str("</");
        self.out.push_str(&name);
        self.out.push('>');
    }

    /// Content of a mixed element, written verbatim apart from escaping
    fn inline(&mut self, node: Node<'_, '_>) {
        match node.node_type() {
            NodeType::Text => self.out.push_str(&escape_text(node.text().unwrap_or_default())),
            NodeType::Element => {
                let name = qualified_element_name(node);
                self.out.push('<');
                self.out.push_str(&name);
                self.namespace_declarations(node);
                self.attributes(node);
                if node.has_children() {
                    self.out.push('>');
                    for child in node.children() {
                        self.inline(child);
                    }
                    self.out.push_str("</");
                    self.out.push_str(&name);
                    self.out.push('>');
                } else {
                    self.out.push_str("/>");
                }
            }
            _ => self.misc(node),
        }
    }

    fn misc(&mut self, node: Node<'_, '_>) {
        match node.node_type() {
            NodeType::Comment => {
                self.out.push_str("<!--");
                self.out.push_str(node.text().unwrap_or_default());
                self.out.push_str("-->");
            }
            NodeType::PI => {
                if let Some(pi) = node.pi() {
                    self.out.push_str("<?");
                    self.out.push_str(pi.target);
                    if let Some(value) = pi.value {
                        self.out.push(' ');
                        self.out.push_str(value);
                    }
                    self.out.push_str("?>");
                }
            }
            NodeType::Text => self.out.push_str(&escape_text(node.text().unwrap_or_default())),
            NodeType::Element | NodeType::Root => {}
        }
    }

    fn style_element(&mut self, text: &str) {
        self.out.push_str("<style>");
        self.out.push_str(&escape_text(text));
        self.out.push_str("</style>");
    }

    /// `xmlns` declarations introduced by this element
    fn namespace_declarations(&mut self, node: Node<'_, '_>) {
        let parent = node.parent_element();
        for ns in node.namespaces() {
            if ns.uri() == XML_NS_URI {
                continue;
            }
            let inherited = parent
                .map(|p| {
                    p.namespaces()
                        .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
                })
                .unwrap_or(false);
            if inherited {
                continue;
            }
            match ns.name() {
                Some(prefix) => self.out.push_str(&format!(" xmlns:{}=", prefix)),
                None => self.out.push_str(" xmlns="),
            }
            self.out.push_str(&quote_attr(ns.uri()));
        }
    }

    fn attributes(&mut self, node: Node<'_, '_>) {
        let rewritten = (self.rewrite_class)(node);
        for attr in node.attributes() {
            let name = match attr.namespace() {
                Some(uri) => match attribute_prefix(node, uri) {
                    Some(prefix) => format!("{}:{}", prefix, attr.name()),
                    None => attr.name().to_string(),
                },
                None => attr.name().to_string(),
            };
            let value = match (&rewritten, attr.namespace(), attr.name()) {
                (Some(class), None, "class") => class.as_str(),
                _ => attr.value(),
            };
            self.out.push(' ');
            self.out.push_str(&name);
            self.out.push('=');
            self.out.push_str(&quote_attr(value));
        }
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }
}

fn qualified_element_name(node: Node<'_, '_>) -> String {
    let local = node.tag_name().name();
    let Some(uri) = node.tag_name().namespace() else {
        return local.to_string();
    };
    let is_default = node
        .namespaces()
        .any(|ns| ns.name().is_none() && ns.uri() == uri);
    if is_default {
        return local.to_string();
    }
    match node
        .namespaces()
        .find(|ns| ns.uri() == uri)
        .and_then(|ns| ns.name())
    {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

/// Attributes never use the default namespace, so only prefixed ones count
fn attribute_prefix<'a>(node: Node<'a, '_>, uri: &str) -> Option<&'a str> {
    if uri == XML_NS_URI {
        return Some("xml");
    }
    node.namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(|ns| ns.name())
}

fn is_blank_text(node: Node<'_, '_>) -> bool {
    node.is_text() && node.text().map(|t| t.trim().is_empty()).unwrap_or(true)
}

fn has_text_content(node: Node<'_, '_>) -> bool {
    node.children().any(|c| c.is_text() && !is_blank_text(c))
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn quote_attr(s: &str) -> String {
    let escaped = s
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\t', "&#9;");
    format!("\"{}\"", escaped)
}
