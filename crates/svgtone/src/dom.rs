//! Owned, mutable SVG element tree.
//!
//! `roxmltree` gives a fast read-only view of the input. Merging needs to edit `class`
//! attributes and insert a `<style>` element, so the parsed tree is copied into owned nodes
//! and serialized back by hand.

use indexmap::IndexMap;

const NS_XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),
    #[error("root element is <{found}>, expected <svg>")]
    NotSvg { found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        value: Option<String>,
    },
}

/// A single element: qualified tag name, attributes in source order, and child nodes.
///
/// Namespace declarations are kept as ordinary `xmlns`/`xmlns:*` attributes so that
/// serialization reproduces them where they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Concatenated text of this element's direct text children.
    #[cfg(test)]
    pub(crate) fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Appends text, extending a trailing text node instead of creating a sibling.
    pub fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
            return;
        }
        self.children.push(Node::Text(text.to_string()));
    }
}

/// A parsed SVG document.
///
/// Everything before and after the root element (XML declaration, DOCTYPE, comments) is kept
/// verbatim, so only the root element itself goes through the owned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    prolog: String,
    pub root: Element,
    epilog: String,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, DomError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        let root = doc.root_element();
        if !root.has_tag_name("svg") {
            return Err(DomError::NotSvg {
                found: root.tag_name().name().to_string(),
            });
        }

        let range = root.range();
        Ok(Self {
            prolog: text[..range.start].to_string(),
            root: build_element(root),
            epilog: text[range.end..].to_string(),
        })
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::with_capacity(self.prolog.len() + self.epilog.len() + 1024);
        out.push_str(&self.prolog);
        write_element(&mut out, &self.root);
        out.push_str(&self.epilog);
        out
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = match namespace {
        None => None,
        Some(NS_XML_URI) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri),
    };
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local}"),
        _ => local.to_string(),
    }
}

/// Attribute names of the start tag at the beginning of `tag`, in source order, namespace
/// declarations included. The markup has already been validated by roxmltree.
fn start_tag_attr_names(tag: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let rest = tag.strip_prefix('<').unwrap_or(tag);
    let name_end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    let mut rest = &rest[name_end..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() || rest.starts_with(['/', '>']) {
            break;
        }
        let Some(eq) = rest.find('=') else {
            break;
        };
        names.push(rest[..eq].trim_end_matches(|c: char| c.is_ascii_whitespace()));
        rest = rest[eq + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace());
        let Some(quote) = rest.chars().next().filter(|&q| matches!(q, '"' | '\'')) else {
            break;
        };
        let Some(close) = rest[1..].find(quote) else {
            break;
        };
        rest = &rest[close + 2..];
    }
    names
}

fn build_element(n: roxmltree::Node<'_, '_>) -> Element {
    let mut attrs: IndexMap<String, String> = IndexMap::new();

    // roxmltree keeps namespace declarations apart from attributes; restore the written order.
    let source = &n.document().input_text()[n.range().start..];
    let mut plain = n.attributes();
    for raw in start_tag_attr_names(source) {
        let declared = match raw {
            "xmlns" => Some(None),
            _ => raw.strip_prefix("xmlns:").map(Some),
        };
        match declared {
            Some(prefix) => {
                let uri = n.lookup_namespace_uri(prefix).unwrap_or_default();
                attrs.insert(raw.to_string(), uri.to_string());
            }
            None => push_attr(&mut attrs, n, plain.next()),
        }
    }
    for a in plain {
        push_attr(&mut attrs, n, Some(a));
    }

    let mut children: Vec<Node> = Vec::new();
    for c in n.children() {
        match c.node_type() {
            roxmltree::NodeType::Element => children.push(Node::Element(build_element(c))),
            roxmltree::NodeType::Text => {
                children.push(Node::Text(c.text().unwrap_or_default().to_string()))
            }
            roxmltree::NodeType::Comment => {
                children.push(Node::Comment(c.text().unwrap_or_default().to_string()))
            }
            roxmltree::NodeType::PI => {
                if let Some(pi) = c.pi() {
                    children.push(Node::ProcessingInstruction {
                        target: pi.target.to_string(),
                        value: pi.value.map(str::to_string),
                    });
                }
            }
            roxmltree::NodeType::Root => {}
        }
    }

    let tag = n.tag_name();
    Element {
        name: qualified_name(n, tag.namespace(), tag.name()),
        attrs,
        children,
    }
}

fn push_attr(
    attrs: &mut IndexMap<String, String>,
    n: roxmltree::Node<'_, '_>,
    attr: Option<roxmltree::Attribute<'_, '_>>,
) {
    if let Some(a) = attr {
        attrs.insert(
            qualified_name(n, a.namespace(), a.name()),
            a.value().to_string(),
        );
    }
}

fn escape_into(out: &mut String, text: &str, attr: bool) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' if !attr => "&gt;",
            b'"' if attr => "&quot;",
            b'\'' if attr => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        escape_into(out, v, true);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(out, c),
            Node::Text(t) => escape_into(out, t, false),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::ProcessingInstruction { target, value } => {
                out.push_str("<?");
                out.push_str(target);
                if let Some(v) = value {
                    out.push(' ');
                    out.push_str(v);
                }
                out.push_str("?>");
            }
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}
