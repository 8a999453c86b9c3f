//! Arena-backed XML element tree.
//!
//! All nodes live in one vector and refer to each other by [`NodeId`].
//! Node identity is the id, never structural equality: two runs with the
//! same text are still two different nodes.
//!
//! The substitution passes do not mutate a tree in place. Each pass reads a
//! source tree and rebuilds into a fresh one, using [`XmlTree::copy_element`]
//! and [`XmlTree::import`] to carry nodes across.
//!
//! # Example
//!
//! ```
//! use docx_bookmarks::xml::XmlTree;
//!
//! let tree = XmlTree::parse_str(r#"<a xmlns="urn:x"><b>hi</b></a>"#).unwrap();
//! let b = tree.children(tree.root())[0];
//! assert_eq!(tree.text_content(b), "hi");
//! ```

pub mod names;
mod reader;
mod writer;

use std::borrow::Cow;

pub use names::{Kind, Names, XName};

/// Identifier of a node within an [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A namespace-resolved element or attribute name.
///
/// The prefix is kept only for serialization. Two names are the same
/// vocabulary item when [`QName::is`] says so.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub ns: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(ns: Option<&str>, prefix: Option<&str>, local: &str) -> Self {
        Self {
            ns: ns.map(str::to_string),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
            local: local.to_string(),
        }
    }

    /// A name without namespace or prefix.
    pub fn local(local: &str) -> Self {
        Self::new(None, None, local)
    }

    /// Check namespace and local name, ignoring the prefix.
    pub fn is(&self, name: XName) -> bool {
        self.ns.as_deref() == Some(name.ns) && self.local == name.local
    }

    /// The name as written in markup (`prefix:local`).
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(&self.local),
        }
    }
}

impl From<XName> for QName {
    fn from(name: XName) -> Self {
        QName::new(Some(name.ns), Some(name.prefix), name.local)
    }
}

/// An attribute in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { name: QName, attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An XML document held as an arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct XmlTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl XmlTree {
    /// Create an empty tree. Call [`XmlTree::set_root`] once the root is built.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a UTF-8 string into a tree.
    pub fn parse_str(content: &str) -> crate::Result<Self> {
        reader::parse_str(content)
    }

    /// Parse raw part bytes, honouring a UTF-8 or UTF-16 byte-order mark.
    pub fn parse(bytes: &[u8]) -> crate::Result<Self> {
        reader::parse_bytes(bytes)
    }

    /// Serialize to UTF-8 bytes with an XML declaration.
    pub fn to_xml(&self) -> crate::Result<Vec<u8>> {
        writer::write_tree(self)
    }

    /// Serialize a subtree to a string, without declaration.
    pub fn to_xml_string(&self, id: NodeId) -> crate::Result<String> {
        writer::write_fragment(self, id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Element name, or `None` for text and comments.
    pub fn name(&self, id: NodeId) -> Option<&QName> {
        match &self.node(id).data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Classify a node through the name table.
    pub fn kind(&self, id: NodeId, names: &Names) -> Kind {
        self.name(id).map_or(Kind::CharData, |name| names.kind(name))
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Look up an attribute value by namespace and local name.
    pub fn attr(&self, id: NodeId, name: XName) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.is(name))
            .map(|a| a.value.as_str())
    }

    /// Look up an attribute that has no namespace.
    pub fn plain_attr(&self, id: NodeId, local: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.ns.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Iterate over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over all descendants of a node in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Allocate a detached element.
    pub fn alloc_element(&mut self, name: QName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element { name, attrs })
    }

    /// Allocate a detached text node.
    pub fn alloc_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub(crate) fn alloc_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Replace the child list of `parent`.
    ///
    /// Previous children that are not in the new list become detached.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        let old = std::mem::take(&mut self.node_mut(parent).children);
        for id in old {
            self.node_mut(id).parent = None;
        }
        for &id in &children {
            self.node_mut(id).parent = Some(parent);
        }
        self.node_mut(parent).children = children;
    }

    /// Insert a detached node right after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let position = self
            .children(parent)
            .iter()
            .position(|&c| c == sibling)
            .map_or(self.children(parent).len(), |i| i + 1);
        self.node_mut(new_node).parent = Some(parent);
        self.node_mut(parent).children.insert(position, new_node);
    }

    /// Unlink a node from its parent. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    /// Copy a node of `src` without its children.
    pub fn copy_element(&mut self, src: &XmlTree, id: NodeId) -> NodeId {
        let data = src.node(id).data.clone();
        self.alloc(data)
    }

    /// Deep-copy a subtree of `src` into this tree, returning the detached copy.
    pub fn import(&mut self, src: &XmlTree, id: NodeId) -> NodeId {
        let copy = self.copy_element(src, id);
        for &child in src.children(id) {
            let child_copy = self.import(src, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep-copy a subtree within this tree.
    pub fn duplicate(&mut self, id: NodeId) -> NodeId {
        let data = self.node(id).data.clone();
        let copy = self.alloc(data);
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.duplicate(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Build a name for a new element, reusing the prefix the root declares
    /// for its namespace.
    pub fn qname(&self, name: XName) -> QName {
        let prefix = self.declared_prefix(name.ns).unwrap_or(Some(name.prefix));
        QName::new(Some(name.ns), prefix, name.local)
    }

    /// Prefix the root binds to `ns`: `Some(None)` for the default namespace.
    fn declared_prefix(&self, ns: &str) -> Option<Option<&str>> {
        if ns == names::XML {
            return Some(Some("xml"));
        }
        if self.nodes.is_empty() {
            return None;
        }
        self.attrs(self.root)
            .iter()
            .filter(|a| a.name.ns.as_deref() == Some(names::XMLNS) && a.value == ns)
            .map(|a| match a.name.prefix {
                Some(_) => Some(a.name.local.as_str()),
                None => None,
            })
            .next()
    }

    /// Declare `ns` on the root with `prefix` unless it is already bound.
    pub fn ensure_namespace(&mut self, ns: &str, prefix: &str) {
        if self.nodes.is_empty() || self.declared_prefix(ns).is_some() {
            return;
        }
        let root = self.root;
        if let NodeData::Element { attrs, .. } = &mut self.node_mut(root).data {
            attrs.push(Attribute::new(
                QName::new(Some(names::XMLNS), Some("xmlns"), prefix),
                ns,
            ));
        }
    }
}

/// Iterator over ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a XmlTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over descendants.
pub struct Descendants<'a> {
    tree: &'a XmlTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
