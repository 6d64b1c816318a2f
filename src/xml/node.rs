//! Owned XML tree nodes
//!
//! Every element exclusively owns its children. Nodes are addressed by index
//! paths (child indices starting at the root element), so detaching a node
//! is a plain `Vec::remove` on its parent and never leaves dangling aliases.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;

/// Index path from the root element to a descendant
pub type NodePath = Vec<usize>;

/// A node in the document tree
#[derive(Debug, Clone)]
pub enum Node {
    /// An element with its own subtree
    Element(Element),
    /// Character data, kept escaped exactly as read
    Text(BytesText<'static>),
    /// Comments, CDATA, declarations, doctypes and processing instructions,
    /// written back verbatim
    Markup(Event<'static>),
}

impl Node {
    /// Create a text node from already escaped content
    pub fn text(escaped: impl Into<String>) -> Self {
        Node::Text(BytesText::from_escaped(escaped.into()))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is a text node consisting only of whitespace
    pub fn is_whitespace(&self) -> bool {
        match self {
            Node::Text(text) => text.iter().all(u8::is_ascii_whitespace),
            _ => false,
        }
    }

    /// Raw (escaped) content of a text node
    pub fn raw_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Node::Text(text) => Some(String::from_utf8_lossy(text)),
            _ => None,
        }
    }
}

/// An XML element
///
/// The start tag is kept as read, so attribute order, quoting and spacing
/// survive a load/write round trip untouched.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) start: BytesStart<'static>,
    pub(crate) children: Vec<Node>,
    /// End tag as read, `None` for self-closing or built elements
    pub(crate) end: Option<BytesEnd<'static>>,
    /// Written as `<name/>` rather than `<name></name>`
    pub(crate) self_closing: bool,
}

impl Element {
    pub(crate) fn open(start: BytesStart<'static>) -> Self {
        Self {
            start,
            children: Vec::new(),
            end: None,
            self_closing: false,
        }
    }

    pub(crate) fn self_closing(start: BytesStart<'static>) -> Self {
        Self {
            start,
            children: Vec::new(),
            end: None,
            self_closing: true,
        }
    }

    /// Qualified element name
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    /// All attributes in document order, values unescaped
    ///
    /// Attributes that cannot be decoded are skipped.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.start
            .attributes()
            .filter_map(|attr| attr.ok())
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        self.self_closing = false;
        &mut self.children
    }

    /// Direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name() == name)
    }

    /// Unescaped text of the direct text and CDATA children
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(text) => match text.unescape() {
                    Ok(unescaped) => out.push_str(&unescaped),
                    Err(_) => out.push_str(&String::from_utf8_lossy(text)),
                },
                Node::Markup(Event::CData(cdata)) => {
                    out.push_str(&String::from_utf8_lossy(cdata));
                }
                _ => {}
            }
        }
        out
    }

    /// Append a node as the last child
    pub fn push(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    /// Insert a node at `index` among the children
    pub fn insert(&mut self, index: usize, node: Node) {
        self.children_mut().insert(index, node);
    }

    /// Paths of all descendant elements named `name`, in document order
    ///
    /// The element itself is not included.
    pub fn descendant_paths(&self, name: &str) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(name, &mut prefix, &mut found);
        found
    }

    fn collect_paths(&self, name: &str, prefix: &mut NodePath, found: &mut Vec<NodePath>) {
        for (index, node) in self.children.iter().enumerate() {
            if let Node::Element(element) = node {
                prefix.push(index);
                if element.name() == name {
                    found.push(prefix.clone());
                }
                element.collect_paths(name, prefix, found);
                prefix.pop();
            }
        }
    }

    /// Element at `path`; the empty path is this element
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children.get(*first)?.as_element()?.element_at(rest),
        }
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self
                .children
                .get_mut(*first)?
                .as_element_mut()?
                .element_at_mut(rest),
        }
    }

    /// Detach the node at `path` from its parent and return it
    pub fn remove_at(&mut self, path: &[usize]) -> Option<Node> {
        let (last, parent_path) = path.split_last()?;
        let parent = self.element_at_mut(parent_path)?;
        if *last < parent.children.len() {
            Some(parent.children.remove(*last))
        } else {
            None
        }
    }

    /// Shift every line break inside whitespace-only text of this subtree
    /// by `indent`, writing line breaks as `line_ending`
    pub fn reindent(&mut self, line_ending: &str, indent: &str) {
        let line_break = format!("{}{}", line_ending, indent);
        for node in &mut self.children {
            if let Node::Element(element) = node {
                element.reindent(line_ending, indent);
            } else if node.is_whitespace() {
                let shifted = node
                    .raw_text()
                    .map(|raw| raw.replace("\r\n", "\n").replace('\n', &line_break));
                if let Some(shifted) = shifted {
                    *node = Node::text(shifted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::xml::Document;

    const SAMPLE: &str = r#"<a x="1" y='two'><b>one</b><c><b>two &amp; more</b></c><b/></a>"#;

    #[test]
    fn test_descendant_paths_in_document_order() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let paths = doc.root().descendant_paths("b");
        assert_eq!(paths, vec![vec![0], vec![1, 0], vec![2]]);
    }

    #[test]
    fn test_text_is_unescaped() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let nested = doc.root().element_at(&[1, 0]).unwrap();
        assert_eq!(nested.text(), "two & more");
    }

    #[test]
    fn test_attributes_keep_order() {
        let doc = Document::from_str(SAMPLE).unwrap();
        assert_eq!(
            doc.root().attributes(),
            vec![("x".to_string(), "1".to_string()), ("y".to_string(), "two".to_string())]
        );
        assert_eq!(doc.root().attribute("y").as_deref(), Some("two"));
        assert_eq!(doc.root().attribute("z"), None);
    }

    #[test]
    fn test_remove_at_detaches_subtree() {
        let mut doc = Document::from_str(SAMPLE).unwrap();
        let removed = doc.root_mut().remove_at(&[1]).unwrap();
        assert_eq!(removed.as_element().unwrap().name(), "c");
        assert_eq!(doc.to_string().unwrap(), r#"<a x="1" y='two'><b>one</b><b/></a>"#);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut doc = Document::from_str(SAMPLE).unwrap();
        assert!(doc.root_mut().remove_at(&[7]).is_none());
        assert!(doc.root_mut().remove_at(&[]).is_none());
    }

    #[test]
    fn test_reindent_shifts_whitespace_only() {
        let mut doc = Document::from_str("<a>\n  <b>x y</b>\n</a>").unwrap();
        doc.root_mut().reindent("\n", "    ");
        assert_eq!(doc.to_string().unwrap(), "<a>\n      <b>x y</b>\n    </a>");
    }

    #[test]
    fn test_reindent_converts_line_endings() {
        let mut doc = Document::from_str("<a>\n  <b>\r\n    <c/>\n  </b>\n</a>").unwrap();
        doc.root_mut().reindent("\r\n", "  ");
        assert_eq!(
            doc.to_string().unwrap(),
            "<a>\r\n    <b>\r\n      <c/>\r\n    </b>\r\n  </a>"
        );
    }
}
