//! Owned HTML document tree.
//!
//! Documents are parsed with `tl` and converted into an owned [`Node`] tree,
//! so that a subtree can outlive the source text and be moved into a feed
//! entry. Text and attribute values are kept exactly as written (character
//! references included), which makes serialization a faithful copy of the
//! source markup. Comments are dropped.

pub mod html;
pub mod query;

pub use query::{NodePath, Predicate, TreeNode, find, find_path, has_attr, is_tag, not};

use html::{escape_attr, is_raw_text_element, is_void_element, parse_start_tag, unescape};

/// A node of an owned document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Top-level container returned by [`parse`].
    Document(Vec<Node>),
    Element(Element),
    /// Source text, character references not decoded.
    Text(String),
}

impl Default for Node {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes in source order; `None` for bare attributes.
    pub attrs: Vec<(String, Option<String>)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_deref().unwrap_or_default())
    }
}

/// HTML parse failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

/// Parse an HTML document into an owned tree.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let dom = tl::parse(source, tl::ParserOptions::default())
        .map_err(|e| ParseError(format!("{e:?}")))?;
    let parser = dom.parser();

    let children = dom
        .children()
        .iter()
        .filter_map(|handle| convert(*handle, parser))
        .collect();
    Ok(Node::Document(children))
}

/// Convert a tl node handle to an owned node
fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let mut elem = Element::new(tag.name().as_utf8_str().to_lowercase());
            // tl keeps attributes in a hash map; read them from the start tag
            elem.attrs = parse_start_tag(&tag.raw().as_utf8_str());

            elem.children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(*child, parser))
                .collect();

            Some(Node::Element(elem))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(bytes.as_utf8_str().to_string())),
        tl::Node::Comment(_) => None,
    }
}

impl TreeNode for Node {
    fn tag(&self) -> Option<&str> {
        match self {
            Self::Element(elem) => Some(&elem.name),
            _ => None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element(elem) => elem.attr(name),
            _ => None,
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            Self::Document(children) => children,
            Self::Element(elem) => &elem.children,
            Self::Text(_) => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [Self] {
        match self {
            Self::Document(children) => children,
            Self::Element(elem) => &mut elem.children,
            Self::Text(_) => &mut [],
        }
    }

    fn rename(&mut self, tag: &str) {
        if let Self::Element(elem) = self {
            elem.name = tag.to_ascii_lowercase();
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&unescape(text)),
            Self::Element(elem) if is_raw_text_element(&elem.name) => {}
            _ => self.children().iter().for_each(|child| child.write_text(out)),
        }
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Self::Document(children) => children.iter().for_each(|child| child.write_markup(out)),
            Self::Text(text) => out.push_str(text),
            Self::Element(elem) => {
                out.push('<');
                out.push_str(&elem.name);
                for (key, value) in &elem.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value.as_deref().unwrap_or_default()));
                    out.push('"');
                }
                if is_void_element(&elem.name) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &elem.children {
                    child.write_markup(out);
                }
                out.push_str("</");
                out.push_str(&elem.name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc = parse("<!DOCTYPE html><html><body><p>hi</p></body></html>").unwrap();
        assert!(matches!(doc, Node::Document(_)));
        let p = find(&doc, &is_tag("p")).unwrap();
        assert_eq!(p.text(), "hi");
    }

    #[test]
    fn test_tag_names_are_lowercase() {
        let doc = parse("<ARTICLE><H1>Title</H1></ARTICLE>").unwrap();
        assert!(find(&doc, &is_tag("article")).is_some());
        assert_eq!(find(&doc, &is_tag("h1")).and_then(TreeNode::tag), Some("h1"));
    }

    #[test]
    fn test_attributes() {
        let doc = parse(r#"<time class="feed" datetime="2024-12-03" hidden>x</time>"#).unwrap();
        let time = find(&doc, &is_tag("time")).unwrap();
        assert_eq!(time.attr("class"), Some("feed"));
        assert_eq!(time.attr("datetime"), Some("2024-12-03"));
        assert_eq!(time.attr("hidden"), Some(""));
        assert_eq!(time.attr("missing"), None);
    }

    #[test]
    fn test_markup_round_trip() {
        let source = "<article class=\"body\">\n<h1>Title</h1>\n<p>Fish &amp; chips</p>\n</article>";
        let doc = parse(source).unwrap();
        let article = find(&doc, &is_tag("article")).unwrap();
        assert_eq!(article.markup(), source);
    }

    #[test]
    fn test_markup_keeps_attribute_order() {
        let source = r#"<div data-a="1" id="main" lang="en" class="feed post" title="T" data-z="2"><img src="a.png" alt="A" class="wide" width="10" height="20"/></div>"#;

        let first = parse(source).unwrap();
        let div = find(&first, &is_tag("div")).unwrap();
        assert_eq!(div.markup(), source);

        // Same input, same output
        let second = parse(source).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            find(&second, &is_tag("div")).unwrap().markup(),
            div.markup()
        );
    }

    #[test]
    fn test_markup_void_element() {
        let doc = parse("<p>a<br>b</p>").unwrap();
        assert_eq!(find(&doc, &is_tag("p")).unwrap().markup(), "<p>a<br/>b</p>");
    }

    #[test]
    fn test_markup_drops_comments() {
        let doc = parse("<div><!-- note --><p>x</p></div>").unwrap();
        assert_eq!(find(&doc, &is_tag("div")).unwrap().markup(), "<div><p>x</p></div>");
    }

    #[test]
    fn test_text_strips_markup() {
        let doc = parse("<h1>Hello <em>brave</em> &amp; <b>new</b> world</h1>").unwrap();
        assert_eq!(
            find(&doc, &is_tag("h1")).unwrap().text(),
            "Hello brave & new world"
        );
    }

    #[test]
    fn test_text_skips_scripts() {
        let doc = parse("<div>a<script>var x = 1;</script>b</div>").unwrap();
        assert_eq!(find(&doc, &is_tag("div")).unwrap().text(), "ab");
    }

    #[test]
    fn test_rename_keeps_attributes_and_children() {
        let mut node = Node::Element(Element {
            name: "body".into(),
            attrs: vec![("class".into(), Some("feed".into()))],
            children: vec![Node::Text("x".into())],
        });
        node.rename("div");
        assert_eq!(node.markup(), r#"<div class="feed">x</div>"#);

        let mut text = Node::Text("t".into());
        text.rename("div");
        assert_eq!(text, Node::Text("t".into()));
    }
}
