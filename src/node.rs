//! Arena storage for the document tree.
//!
//! Every node of a document lives in a single `Vec<NodeData>` and is addressed
//! by a [`NodeId`], a plain index into that vector. Parent links are stored as
//! ids as well, so a child never owns its parent and the tree has no reference
//! cycles. The document node always sits at index 0.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use string_cache::DefaultAtom as Atom;

use crate::xml_path::XmlPath;

/// Structural name shared by all text nodes.
pub const TEXT_NODE_NAME: &str = "#text";

/// The only accepted argument of the text accessors on [`ElementRef`](crate::ElementRef).
pub const TEXT_ACCESSOR: char = '#';

/// Index of a node in its document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The document node.
    pub const DOCUMENT: NodeId = NodeId(0);

    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => Self(raw),
            Err(_) => panic!("document arena exceeds {} nodes", u32::MAX),
        }
    }

    /// Returns the underlying index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies the builder, and later the document, that created a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TreeTag(u32);

impl TreeTag {
    /// A tag no other builder in this process has received.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Handles are only meaningful for the builder (and document) that
        /// created them.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            tree: TreeTag,
            node: NodeId,
        }

        impl $name {
            pub(crate) fn new(tree: TreeTag, node: NodeId) -> Self {
                Self { tree, node }
            }

            #[inline]
            pub fn id(self) -> NodeId {
                self.node
            }

            #[inline]
            pub(crate) fn tree(self) -> TreeTag {
                self.tree
            }
        }

        impl From<$name> for NodeId {
            fn from(value: $name) -> Self {
                value.node
            }
        }
    };
}

typed_id!(
    /// Handle to an element node.
    ElementId
);
typed_id!(
    /// Handle to an attribute node.
    AttributeId
);
typed_id!(
    /// Handle to a text node.
    TextId
);

/// A node that may appear in an element's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildId {
    Element(ElementId),
    Text(TextId),
}

impl ChildId {
    #[inline]
    pub fn id(self) -> NodeId {
        match self {
            ChildId::Element(e) => e.id(),
            ChildId::Text(t) => t.id(),
        }
    }
}

impl From<ElementId> for ChildId {
    fn from(value: ElementId) -> Self {
        ChildId::Element(value)
    }
}

impl From<TextId> for ChildId {
    fn from(value: TextId) -> Self {
        ChildId::Text(value)
    }
}

/// A node that may own an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentId {
    Document,
    Element(ElementId),
}

impl ParentId {
    #[inline]
    pub fn id(self) -> NodeId {
        match self {
            ParentId::Document => NodeId::DOCUMENT,
            ParentId::Element(e) => e.id(),
        }
    }

    /// The tree of an element parent. The document parent belongs to every tree.
    pub(crate) fn tree(self) -> Option<TreeTag> {
        match self {
            ParentId::Document => None,
            ParentId::Element(e) => Some(e.tree()),
        }
    }
}

impl From<ElementId> for ParentId {
    fn from(value: ElementId) -> Self {
        ParentId::Element(value)
    }
}

/// The closed set of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Attribute,
    Text,
}

pub(crate) type AttributeMap = IndexMap<Atom, AttributeId, FxBuildHasher>;

/// Variant-specific payload of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document {
        element: Option<ElementId>,
    },
    Element {
        attributes: AttributeMap,
        children: Vec<ChildId>,
    },
    Attribute {
        value: String,
    },
    Text {
        value: String,
    },
}

impl NodeKind {
    pub(crate) fn element() -> Self {
        NodeKind::Element {
            attributes: AttributeMap::default(),
            children: Vec::new(),
        }
    }
}

/// Storage for a single node in the arena.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    /// Tag, attribute or document name; `#text` for text nodes.
    pub name: Atom,
    /// Owning node. Only the document has none.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl NodeData {
    pub(crate) fn new(name: Atom, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self { name, parent, kind }
    }
}

/// Builds the path of `id` by walking parent links up to the document.
pub(crate) fn path_of(nodes: &[NodeData], id: NodeId) -> XmlPath {
    let mut parts = Vec::new();
    let mut current = Some(id);
    while let Some(node_id) = current {
        let Some(node) = nodes.get(node_id.index()) else {
            break;
        };
        match node.kind {
            NodeKind::Document { .. } => break,
            NodeKind::Attribute { .. } => parts.push(Atom::from(format!("@{}", node.name))),
            _ => parts.push(node.name.clone()),
        }
        current = node.parent;
    }
    parts.reverse();
    XmlPath::from_parts(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_arena() -> Vec<NodeData> {
        vec![
            NodeData::new(
                Atom::from("doc"),
                None,
                NodeKind::Document { element: None },
            ),
            NodeData::new(
                Atom::from("root"),
                Some(NodeId::DOCUMENT),
                NodeKind::element(),
            ),
            NodeData::new(
                Atom::from("item"),
                Some(NodeId::from_index(1)),
                NodeKind::element(),
            ),
            NodeData::new(
                Atom::from("id"),
                Some(NodeId::from_index(2)),
                NodeKind::Attribute {
                    value: "7".to_string(),
                },
            ),
            NodeData::new(
                Atom::from(TEXT_NODE_NAME),
                Some(NodeId::from_index(2)),
                NodeKind::Text {
                    value: "x".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_path_of() {
        let nodes = sample_arena();
        assert_eq!(path_of(&nodes, NodeId::DOCUMENT).to_string(), "/");
        assert_eq!(path_of(&nodes, NodeId::from_index(2)).to_string(), "/root/item");
        assert_eq!(
            path_of(&nodes, NodeId::from_index(3)).to_string(),
            "/root/item/@id"
        );
        assert_eq!(
            path_of(&nodes, NodeId::from_index(4)).to_string(),
            "/root/item/#text"
        );
    }

    #[test]
    fn test_typed_ids_convert_to_node_id() {
        let tree = TreeTag::next();
        let element = ElementId::new(tree, NodeId::from_index(3));
        let text = TextId::new(tree, NodeId::from_index(4));
        assert_eq!(NodeId::from(element), NodeId::from_index(3));
        assert_eq!(ChildId::from(text).id(), NodeId::from_index(4));
        assert_eq!(ParentId::from(element).id().index(), 3);
        assert_eq!(ParentId::Document.id(), NodeId::DOCUMENT);
        assert_eq!(NodeId::from_index(12).to_string(), "#12");
    }

    #[test]
    fn test_tree_tags_are_distinct() {
        let first = TreeTag::next();
        let second = TreeTag::next();
        assert_ne!(first, second);

        let same_slot = NodeId::from_index(2);
        assert_ne!(
            ElementId::new(first, same_slot),
            ElementId::new(second, same_slot)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "document arena exceeds")]
    fn test_node_id_overflow_panics() {
        NodeId::from_index(u32::MAX as usize + 1);
    }
}
