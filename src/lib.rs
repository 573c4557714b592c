//! The `xml-doctree` crate provides a small in-memory XML document tree that is
//! built once and then queried read-only.
//!
//! A tree is assembled top-down with a [`DocumentBuilder`]: create the document,
//! create and assign its document element, then give every element its
//! attributes and its children in one bulk call each. [`DocumentBuilder::build`]
//! seals the tree into a [`Document`], which has no mutating operations at all.
//!
//! ## Key Features
//!
//! * A closed set of node kinds: document, element, attribute and text.
//! * Attribute and child collections that are populated exactly once, atomically.
//! * Name-based and pattern-based child lookups that preserve document order.
//! * Sealed documents are `Send + Sync` and can be read from many threads.
pub mod config;

mod errors;
pub use errors::{Collection, Error, Result};

mod builder;
pub use builder::DocumentBuilder;
mod document;
pub use document::{AttributeRef, Document, ElementRef, NodeRef, TextRef};
mod name_pattern;
pub use name_pattern::NamePattern;
mod node;
pub use node::{
    AttributeId, ChildId, ElementId, NodeId, NodeType, ParentId, TEXT_ACCESSOR, TEXT_NODE_NAME,
    TextId,
};
mod xml_path;
pub use xml_path::XmlPath;

pub use config::BuilderOptions;

#[doc(hidden)]
pub use serde_yaml;
