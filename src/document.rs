//! The sealed, read-only document tree and its query surface.
//!
//! A [`Document`] is obtained from [`DocumentBuilder::build`](crate::DocumentBuilder::build)
//! and cannot be modified. Navigation goes through small `Copy` views
//! ([`NodeRef`], [`ElementRef`], [`AttributeRef`], [`TextRef`]) that borrow the
//! document. Child iterators are lazy and `Clone`, so a filtered sequence can
//! be restarted by cloning it before use.
//!
//! Because nothing mutates a document after sealing, a `&Document` can be
//! shared across threads freely.

use std::fmt;
use std::ops::Index;
use std::ptr;

use string_cache::DefaultAtom as Atom;

use crate::errors::{Error, Result};
use crate::name_pattern::NamePattern;
use crate::node::{
    AttributeId, AttributeMap, ChildId, ElementId, NodeData, NodeId, NodeKind, NodeType,
    TEXT_ACCESSOR, TEXT_NODE_NAME, TextId, TreeTag, path_of,
};
use crate::xml_path::XmlPath;

/// An immutable XML document tree.
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 holds the document node.
    nodes: Vec<NodeData>,
    /// Inherited from the builder, so its handles keep working here.
    tree: TreeTag,
}

impl Document {
    pub(crate) fn from_nodes(tree: TreeTag, nodes: Vec<NodeData>) -> Self {
        Self { nodes, tree }
    }

    /// The identifier the document was created with.
    pub fn name(&self) -> &str {
        &self.nodes[NodeId::DOCUMENT.index()].name
    }

    /// Total number of nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The document node itself.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::Document(self)
    }

    /// The single top-level element, if one was assigned during construction.
    pub fn document_element(&self) -> Option<ElementRef<'_>> {
        match &self.nodes[NodeId::DOCUMENT.index()].kind {
            NodeKind::Document {
                element: Some(element),
            } => self.element(*element),
            _ => None,
        }
    }

    /// Looks up any node by its arena index.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::resolve(self, id)
    }

    /// Resolves an element handle issued by the builder of this document.
    /// Handles of other builders yield `None`.
    pub fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        if id.tree() != self.tree {
            return None;
        }
        self.node(id.id())?.as_element()
    }

    /// Location of `id` from the document down, `/` for the document itself.
    pub fn path_of(&self, id: NodeId) -> XmlPath {
        path_of(&self.nodes, id)
    }
}

/// A borrowed view of any node in a [`Document`].
#[derive(Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Element(ElementRef<'a>),
    Attribute(AttributeRef<'a>),
    Text(TextRef<'a>),
}

impl<'a> NodeRef<'a> {
    fn resolve(doc: &'a Document, id: NodeId) -> Option<Self> {
        let data = doc.nodes.get(id.index())?;
        let node = match &data.kind {
            NodeKind::Document { .. } => NodeRef::Document(doc),
            NodeKind::Element {
                attributes,
                children,
            } => NodeRef::Element(ElementRef {
                doc,
                id: ElementId::new(doc.tree, id),
                data,
                attributes,
                children,
            }),
            NodeKind::Attribute { value } => NodeRef::Attribute(AttributeRef {
                doc,
                id: AttributeId::new(doc.tree, id),
                data,
                value,
            }),
            NodeKind::Text { value } => NodeRef::Text(TextRef {
                doc,
                id: TextId::new(doc.tree, id),
                data,
                value,
            }),
        };
        Some(node)
    }

    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Document(_) => NodeId::DOCUMENT,
            NodeRef::Element(e) => e.id.id(),
            NodeRef::Attribute(a) => a.id.id(),
            NodeRef::Text(t) => t.id.id(),
        }
    }

    /// The structural name: tag or attribute name, `#text` for text nodes,
    /// the document identifier for the document.
    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Document(doc) => doc.name(),
            NodeRef::Element(e) => e.name(),
            NodeRef::Attribute(a) => a.name(),
            NodeRef::Text(t) => t.name(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeRef::Document(_) => NodeType::Document,
            NodeRef::Element(_) => NodeType::Element,
            NodeRef::Attribute(_) => NodeType::Attribute,
            NodeRef::Text(_) => NodeType::Text,
        }
    }

    pub fn document(&self) -> &'a Document {
        match self {
            NodeRef::Document(doc) => *doc,
            NodeRef::Element(e) => e.doc,
            NodeRef::Attribute(a) => a.doc,
            NodeRef::Text(t) => t.doc,
        }
    }

    /// The owning node. `None` only for the document.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let doc = self.document();
        let parent = doc.nodes.get(self.id().index())?.parent?;
        NodeRef::resolve(doc, parent)
    }

    /// True only for the document node.
    pub fn is_root(&self) -> bool {
        matches!(self, NodeRef::Document(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeRef::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeRef::Text(_))
    }

    pub fn path(&self) -> XmlPath {
        self.document().path_of(self.id())
    }

    pub fn as_element(self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_attribute(self) -> Option<AttributeRef<'a>> {
        match self {
            NodeRef::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(self) -> Option<TextRef<'a>> {
        match self {
            NodeRef::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.document(), other.document()) && self.id() == other.id()
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Document(doc) => f.debug_tuple("Document").field(&doc.name()).finish(),
            NodeRef::Element(e) => fmt::Debug::fmt(e, f),
            NodeRef::Attribute(a) => fmt::Debug::fmt(a, f),
            NodeRef::Text(t) => fmt::Debug::fmt(t, f),
        }
    }
}

impl<'a> From<ElementRef<'a>> for NodeRef<'a> {
    fn from(value: ElementRef<'a>) -> Self {
        NodeRef::Element(value)
    }
}

impl<'a> From<TextRef<'a>> for NodeRef<'a> {
    fn from(value: TextRef<'a>) -> Self {
        NodeRef::Text(value)
    }
}

/// A borrowed view of an element.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: ElementId,
    data: &'a NodeData,
    attributes: &'a AttributeMap,
    children: &'a [ChildId],
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The owning document or element.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        NodeRef::Element(*self).parent()
    }

    pub fn path(&self) -> XmlPath {
        self.doc.path_of(self.id.id())
    }

    /// Looks up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attribute(name).map(|attribute| attribute.value())
    }

    /// Same as [`attr`](Self::attr).
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.attr(name)
    }

    /// Looks up an attribute the caller expects to be present.
    ///
    /// # Errors
    ///
    /// *   `Error::MissingAttribute`: no attribute with this name exists.
    pub fn require_attr(&self, name: &str) -> Result<&'a str> {
        self.attr(name).ok_or_else(|| Error::MissingAttribute {
            path: self.path(),
            name: name.to_string(),
        })
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(&Atom::from(name))
    }

    pub fn attribute(&self, name: &str) -> Option<AttributeRef<'a>> {
        let id = self.attributes.get(&Atom::from(name))?;
        NodeRef::resolve(self.doc, id.id())?.as_attribute()
    }

    /// Attribute nodes in the order they were supplied.
    pub fn attributes(self) -> impl Iterator<Item = AttributeRef<'a>> + Clone {
        let doc = self.doc;
        self.attributes
            .values()
            .filter_map(move |id| NodeRef::resolve(doc, id.id())?.as_attribute())
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Every child, elements and text, in document order.
    pub fn all_children(self) -> impl Iterator<Item = NodeRef<'a>> + Clone {
        let doc = self.doc;
        self.children
            .iter()
            .filter_map(move |child| NodeRef::resolve(doc, child.id()))
    }

    /// Children whose name equals `name`, in document order.
    ///
    /// `#text` selects the text children.
    pub fn children(self, name: &str) -> impl Iterator<Item = NodeRef<'a>> + Clone + use<'a> {
        let name = Atom::from(name);
        let doc = self.doc;
        self.children
            .iter()
            .filter(move |child| doc.nodes[child.id().index()].name == name)
            .filter_map(move |child| NodeRef::resolve(doc, child.id()))
    }

    /// Children whose whole name matches `pattern`, in document order.
    pub fn children_matching<'p>(
        self,
        pattern: &'p NamePattern,
    ) -> impl Iterator<Item = NodeRef<'a>> + Clone + use<'a, 'p> {
        self.all_children()
            .filter(move |child| pattern.matches(child.name()))
    }

    /// Element children named `name`.
    pub fn elements(self, name: &str) -> impl Iterator<Item = ElementRef<'a>> + Clone + use<'a> {
        self.children(name).filter_map(NodeRef::as_element)
    }

    /// The only child named `name`, which must be an element.
    ///
    /// # Errors
    ///
    /// *   `Error::ChildCount`: no child or more than one child has this name.
    /// *   `Error::NotAnElement`: the single match is a text node.
    pub fn child(self, name: &str) -> Result<ElementRef<'a>> {
        let node = self.single(name, self.children(name))?;
        node.as_element().ok_or_else(|| Error::NotAnElement {
            path: self.path(),
            name: name.to_string(),
        })
    }

    /// The value of the only text child. `accessor` must be `#`.
    ///
    /// # Errors
    ///
    /// *   `Error::UnsupportedAccessor`: `accessor` is not `#`.
    /// *   `Error::ChildCount`: there is no text child or more than one.
    pub fn text(self, accessor: char) -> Result<&'a str> {
        let texts = self.texts(accessor)?;
        Ok(self.single(TEXT_NODE_NAME, texts)?.value())
    }

    /// All text children. `accessor` must be `#`.
    ///
    /// # Errors
    ///
    /// *   `Error::UnsupportedAccessor`: `accessor` is not `#`.
    pub fn texts(self, accessor: char) -> Result<impl Iterator<Item = TextRef<'a>> + Clone + use<'a>> {
        if accessor != TEXT_ACCESSOR {
            return Err(Error::UnsupportedAccessor(accessor));
        }
        Ok(self.children(TEXT_NODE_NAME).filter_map(NodeRef::as_text))
    }

    fn single<T>(&self, name: &str, mut matches: impl Iterator<Item = T>) -> Result<T> {
        match (matches.next(), matches.next()) {
            (Some(node), None) => Ok(node),
            (first, _) => {
                let found = if first.is_none() { 0 } else { 2 + matches.count() };
                Err(Error::ChildCount {
                    path: self.path(),
                    name: name.to_string(),
                    found,
                })
            }
        }
    }
}

impl Index<&str> for ElementRef<'_> {
    type Output = str;

    /// Attribute value by name.
    ///
    /// # Panics
    ///
    /// Panics if the element has no attribute with this name.
    fn index(&self, name: &str) -> &str {
        match self.attr(name) {
            Some(value) => value,
            None => panic!("no attribute '{}' on {}", name, self.path()),
        }
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id.id())
            .field("name", &self.name())
            .field("attributes", &self.attributes.len())
            .field("children", &self.children.len())
            .finish()
    }
}

/// A borrowed view of an attribute.
#[derive(Clone, Copy)]
pub struct AttributeRef<'a> {
    doc: &'a Document,
    id: AttributeId,
    data: &'a NodeData,
    value: &'a str,
}

impl<'a> AttributeRef<'a> {
    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The owning element.
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        NodeRef::Attribute(*self).parent()?.as_element()
    }
}

impl PartialEq for AttributeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for AttributeRef<'_> {}

impl fmt::Display for AttributeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value)
    }
}

impl fmt::Debug for AttributeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("id", &self.id.id())
            .field("name", &self.name())
            .field("value", &self.value)
            .finish()
    }
}

/// A borrowed view of a text node.
#[derive(Clone, Copy)]
pub struct TextRef<'a> {
    doc: &'a Document,
    id: TextId,
    data: &'a NodeData,
    value: &'a str,
}

impl<'a> TextRef<'a> {
    pub fn id(&self) -> TextId {
        self.id
    }

    /// Always `#text`.
    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The owning element.
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        NodeRef::Text(*self).parent()?.as_element()
    }
}

impl PartialEq for TextRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for TextRef<'_> {}

impl fmt::Display for TextRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", TEXT_NODE_NAME, self.value)
    }
}

impl fmt::Debug for TextRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("id", &self.id.id())
            .field("value", &self.value)
            .finish()
    }
}
