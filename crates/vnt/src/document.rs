//! An in-memory render target.

use tracing::warn;
use vnt_lexer::Attributes;

use crate::RenderTarget;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its document.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Element {
        tag: String,
        attributes: Attributes,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
}

/// A node arena implementing [`RenderTarget`].
///
/// ```
/// use vnt::{Document, compile_template};
///
/// let mut doc = Document::new();
/// let root = compile_template(r#"p(class="note")["hi"]"#, &mut doc).unwrap();
/// let root = *root.as_single().unwrap();
/// assert_eq!(doc.to_html(root), r#"<p class="note">hi</p>"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { data, parent: None });
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Tag name, for elements.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Content, for text nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Attributes, for elements.
    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        match &self.node(id)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    /// Children in append order; empty for text nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { children, .. }) => children,
            _ => &[],
        }
    }

    /// The element this node was appended to.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match self.node(id).map(|n| &n.data) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Element { children, .. }) => {
                    stack.extend(children.iter().rev());
                }
                None => {}
            }
        }
    }

    /// Serialize the subtree rooted at `id` as HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Append the HTML of the subtree rooted at `id` to `out`.
    pub fn write_html(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![HtmlStep::Open(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                HtmlStep::Open(id) => id,
                HtmlStep::Close(tag) => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                    continue;
                }
            };
            let Some(node) = self.node(id) else {
                continue;
            };
            match &node.data {
                NodeData::Text(text) => escape_into(text, false, out),
                NodeData::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    out.push('<');
                    out.push_str(tag);
                    for (key, value) in attributes.iter() {
                        out.push(' ');
                        out.push_str(key);
                        out.push_str("=\"");
                        escape_into(value, true, out);
                        out.push('"');
                    }
                    out.push('>');
                    stack.push(HtmlStep::Close(tag));
                    stack.extend(children.iter().rev().map(|&c| HtmlStep::Open(c)));
                }
            }
        }
    }
}

/// Pending work while writing HTML.
enum HtmlStep<'a> {
    Open(NodeId),
    Close(&'a str),
}

impl RenderTarget for Document {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_string(),
            attributes: Attributes::new(),
            children: Vec::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    fn set_attribute(&mut self, node: &NodeId, key: &str, value: &str) {
        match self.nodes.get_mut(node.index()).map(|n| &mut n.data) {
            Some(NodeData::Element { attributes, .. }) => {
                attributes.insert(key, value);
            }
            _ => warn!("set_attribute on non-element node {}", node.index()),
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: NodeId) {
        match self.nodes.get_mut(parent.index()).map(|n| &mut n.data) {
            Some(NodeData::Element { children, .. }) => children.push(child),
            _ => {
                warn!("append_child on non-element node {}", parent.index());
                return;
            }
        }
        if let Some(node) = self.nodes.get_mut(child.index()) {
            node.parent = Some(*parent);
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape text content.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, false, &mut out);
    out
}
