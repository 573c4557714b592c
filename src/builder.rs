//! Construction phase of a document tree.
//!
//! A [`DocumentBuilder`] hands out typed handles for every node it creates.
//! Elements receive their attributes and their children in one bulk call each;
//! once a collection is populated it cannot be populated again. Calling
//! [`DocumentBuilder::build`] consumes the builder and returns the sealed,
//! read-only [`Document`].

use fxhash::FxHashSet;
use log::{debug, trace, warn};
use string_cache::DefaultAtom as Atom;

use crate::config::BuilderOptions;
use crate::document::Document;
use crate::errors::{Collection, Error, Result};
use crate::node::{
    AttributeId, AttributeMap, ChildId, ElementId, NodeData, NodeId, NodeKind, ParentId,
    TEXT_NODE_NAME, TextId, TreeTag, path_of,
};
use crate::xml_path::XmlPath;

/// Mutable builder for a [`Document`].
///
/// # Examples
///
/// ```
/// use xml_doctree::{DocumentBuilder, ParentId};
///
/// let mut builder = DocumentBuilder::new("doc");
/// let root = builder.create_element(ParentId::Document, "root");
/// builder.set_document_element(root)?;
/// let id = builder.create_attribute(root, "id", "42");
/// builder.set_attributes(root, [id])?;
/// let text = builder.create_text(root, "hello");
/// builder.set_children(root, [text.into()])?;
///
/// let doc = builder.build();
/// let root = doc.document_element().unwrap();
/// assert_eq!(root.attr("id"), Some("42"));
/// assert_eq!(root.text('#')?, "hello");
/// # Ok::<(), xml_doctree::Error>(())
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    /// The node arena. Index 0 holds the document node.
    nodes: Vec<NodeData>,
    /// Stamped into every handle so handles of other builders are rejected.
    tree: TreeTag,
    options: BuilderOptions,
}

impl DocumentBuilder {
    /// Starts a new document with default options.
    pub fn new(name: &str) -> Self {
        Self::with_options(name, BuilderOptions::default())
    }

    /// Starts a new document named `name` that applies `options` during construction.
    pub fn with_options(name: &str, options: BuilderOptions) -> Self {
        let document = NodeData::new(
            Atom::from(name),
            None,
            NodeKind::Document { element: None },
        );
        Self {
            nodes: vec![document],
            tree: TreeTag::next(),
            options,
        }
    }

    /// The identifier the document was started with.
    pub fn name(&self) -> &str {
        &self.nodes[NodeId::DOCUMENT.index()].name
    }

    /// The options applied by `create_text` and `build`.
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Number of nodes created so far, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The document element, if one has been assigned.
    pub fn document_element(&self) -> Option<ElementId> {
        match &self.nodes[NodeId::DOCUMENT.index()].kind {
            NodeKind::Document { element } => *element,
            _ => None,
        }
    }

    /// Creates an element owned by `parent`. The element starts without
    /// attributes and without children.
    ///
    /// An element created under another builder's element has no owner here,
    /// so it can never be attached.
    pub fn create_element(&mut self, parent: impl Into<ParentId>, name: &str) -> ElementId {
        let parent = self.local_parent(parent.into());
        let id = self.push(Atom::from(name), parent, NodeKind::element());
        ElementId::new(self.tree, id)
    }

    /// Creates an attribute owned by `parent`.
    pub fn create_attribute(
        &mut self,
        parent: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> AttributeId {
        let kind = NodeKind::Attribute {
            value: value.into(),
        };
        let parent = self.local_parent(ParentId::Element(parent));
        AttributeId::new(self.tree, self.push(Atom::from(name), parent, kind))
    }

    /// Creates a text node owned by `parent`. The value is trimmed when
    /// [`BuilderOptions::trim_text`] is set.
    pub fn create_text(&mut self, parent: ElementId, value: &str) -> TextId {
        let value = if self.options.trim_text {
            value.trim()
        } else {
            value
        };
        let kind = NodeKind::Text {
            value: value.to_string(),
        };
        let parent = self.local_parent(ParentId::Element(parent));
        TextId::new(self.tree, self.push(Atom::from(TEXT_NODE_NAME), parent, kind))
    }

    /// Assigns the document element. This can happen only once.
    ///
    /// # Errors
    ///
    /// *   `Error::DocumentElementAlreadySet`: a document element was assigned before.
    /// *   `Error::OwnershipViolation`: `element` was not created under the document.
    /// *   `Error::UnknownNode`: `element` is not an element of this builder.
    pub fn set_document_element(&mut self, element: ElementId) -> Result<()> {
        let parent = self.element_data(element)?.parent;
        if self.document_element().is_some() {
            return Err(self.reject(Error::DocumentElementAlreadySet {
                document: self.name().to_string(),
            }));
        }
        if parent != Some(NodeId::DOCUMENT) {
            return Err(self.reject(Error::OwnershipViolation {
                owner: XmlPath::default(),
                node: self.path_of(element.id()),
            }));
        }

        if let NodeKind::Document { element: slot } = &mut self.nodes[NodeId::DOCUMENT.index()].kind
        {
            *slot = Some(element);
        }
        trace!("document '{}': document element assigned", self.name());
        Ok(())
    }

    /// Populates the attributes of `element` in the order given.
    ///
    /// Either every attribute is stored or none is: on failure the element's
    /// attributes remain empty and the call may be retried.
    ///
    /// # Errors
    ///
    /// *   `Error::AlreadyConstructed`: the element already has attributes.
    /// *   `Error::DuplicateAttribute`: two attributes share a name.
    /// *   `Error::OwnershipViolation`: an attribute was created under another element.
    /// *   `Error::UnknownNode`: a handle does not belong to this builder.
    pub fn set_attributes(
        &mut self,
        element: ElementId,
        attributes: impl IntoIterator<Item = AttributeId>,
    ) -> Result<()> {
        if !self.attribute_map(element)?.is_empty() {
            return Err(self.reject(Error::AlreadyConstructed {
                path: self.path_of(element.id()),
                collection: Collection::Attributes,
            }));
        }

        let mut map = AttributeMap::default();
        for attribute in attributes {
            let data = self.node_data(attribute.tree(), attribute.id(), |kind| {
                matches!(kind, NodeKind::Attribute { .. })
            })?;
            if map.contains_key(&data.name) {
                return Err(self.reject(Error::DuplicateAttribute {
                    path: self.path_of(element.id()),
                    name: data.name.to_string(),
                }));
            }
            if data.parent != Some(element.id()) {
                return Err(self.reject(Error::OwnershipViolation {
                    owner: self.path_of(element.id()),
                    node: self.path_of(attribute.id()),
                }));
            }
            map.insert(data.name.clone(), attribute);
        }

        let count = map.len();
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[element.id().index()].kind {
            *attributes = map;
        }
        trace!(
            "{}: {} attribute(s) sealed",
            self.path_of(element.id()),
            count
        );
        Ok(())
    }

    /// Populates the children of `element` in document order.
    ///
    /// The whole collection is validated before anything is stored.
    ///
    /// # Errors
    ///
    /// *   `Error::AlreadyConstructed`: the element already has children.
    /// *   `Error::OwnershipViolation`: a node was created under another element.
    /// *   `Error::DuplicateChild`: the same node is listed twice.
    /// *   `Error::UnknownNode`: a handle does not belong to this builder.
    pub fn set_children(
        &mut self,
        element: ElementId,
        children: impl IntoIterator<Item = ChildId>,
    ) -> Result<()> {
        if !self.child_list(element)?.is_empty() {
            return Err(self.reject(Error::AlreadyConstructed {
                path: self.path_of(element.id()),
                collection: Collection::Children,
            }));
        }

        let children: Vec<ChildId> = children.into_iter().collect();
        let mut seen = FxHashSet::default();
        for child in &children {
            let data = match child {
                ChildId::Element(e) => self.element_data(*e)?,
                ChildId::Text(t) => self.node_data(t.tree(), t.id(), |kind| {
                    matches!(kind, NodeKind::Text { .. })
                })?,
            };
            if data.parent != Some(element.id()) {
                return Err(self.reject(Error::OwnershipViolation {
                    owner: self.path_of(element.id()),
                    node: self.path_of(child.id()),
                }));
            }
            if !seen.insert(child.id()) {
                return Err(self.reject(Error::DuplicateChild {
                    path: self.path_of(element.id()),
                    node: self.path_of(child.id()),
                }));
            }
        }

        let count = children.len();
        if let NodeKind::Element {
            children: slot, ..
        } = &mut self.nodes[element.id().index()].kind
        {
            *slot = children;
        }
        trace!("{}: {} child(ren) sealed", self.path_of(element.id()), count);
        Ok(())
    }

    /// Counts nodes that are not reachable from the document through the
    /// document element, its attributes and its children.
    pub fn detached_nodes(&self) -> usize {
        let mut attached = vec![false; self.nodes.len()];
        attached[NodeId::DOCUMENT.index()] = true;
        let mut stack: Vec<NodeId> = self.document_element().map(ElementId::id).into_iter().collect();
        while let Some(id) = stack.pop() {
            attached[id.index()] = true;
            if let NodeKind::Element {
                attributes,
                children,
            } = &self.nodes[id.index()].kind
            {
                for attribute in attributes.values() {
                    attached[attribute.id().index()] = true;
                }
                stack.extend(children.iter().map(|child| child.id()));
            }
        }
        attached.iter().filter(|reachable| !**reachable).count()
    }

    /// Seals the tree. No node can be added or populated afterwards.
    pub fn build(self) -> Document {
        if self.options.report_detached {
            let detached = self.detached_nodes();
            if detached > 0 {
                warn!(
                    "document '{}': {} node(s) were created but never attached",
                    self.name(),
                    detached
                );
            }
        }
        debug!(
            "document '{}' sealed with {} node(s)",
            self.name(),
            self.nodes.len()
        );
        Document::from_nodes(self.tree, self.nodes)
    }

    fn push(&mut self, name: Atom, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData::new(name, parent, kind));
        id
    }

    fn local_parent(&self, parent: ParentId) -> Option<NodeId> {
        match parent.tree() {
            Some(tree) if tree != self.tree => {
                debug!(
                    "document '{}': parent {} belongs to another builder",
                    self.name(),
                    parent.id()
                );
                None
            }
            _ => Some(parent.id()),
        }
    }

    fn node_data(
        &self,
        tree: TreeTag,
        id: NodeId,
        expected: impl Fn(&NodeKind) -> bool,
    ) -> Result<&NodeData> {
        match self.nodes.get(id.index()) {
            Some(data) if tree == self.tree && expected(&data.kind) => Ok(data),
            _ => Err(self.reject(Error::UnknownNode(id))),
        }
    }

    fn element_data(&self, element: ElementId) -> Result<&NodeData> {
        self.node_data(element.tree(), element.id(), |kind| {
            matches!(kind, NodeKind::Element { .. })
        })
    }

    fn attribute_map(&self, element: ElementId) -> Result<&AttributeMap> {
        match &self.element_data(element)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(Error::UnknownNode(element.id())),
        }
    }

    fn child_list(&self, element: ElementId) -> Result<&[ChildId]> {
        match &self.element_data(element)?.kind {
            NodeKind::Element { children, .. } => Ok(children),
            _ => Err(Error::UnknownNode(element.id())),
        }
    }

    fn path_of(&self, id: NodeId) -> XmlPath {
        path_of(&self.nodes, id)
    }

    fn reject(&self, error: Error) -> Error {
        debug!("document '{}': rejected: {}", self.name(), error);
        error
    }
}
