use derive_more::{Display, From};

use crate::node::NodeId;
use crate::xml_path::XmlPath;

pub type Result<T> = core::result::Result<T, Error>;

/// The two collections of an element that are populated once during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Collection {
    #[display("attributes")]
    Attributes,
    #[display("children")]
    Children,
}

#[derive(Debug, From, Display)]
pub enum Error {
    /// Errors from the regex crate while compiling a name pattern
    #[from]
    #[display("invalid name pattern: {_0}")]
    Pattern(regex::Error),
    /// Errors from the Serde YAML crate while reading or writing builder options
    #[from]
    #[display("YAML error: {_0}")]
    Yaml(serde_yaml::Error),
    /// Standard I/O errors
    #[from]
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    /// The document element was already assigned.
    #[display("document element of '{document}' is already assigned")]
    DocumentElementAlreadySet { document: String },
    /// A sealed collection was populated a second time.
    #[display("{collection} of {path} are already populated")]
    AlreadyConstructed {
        path: XmlPath,
        collection: Collection,
    },
    /// Two attributes with the same name were handed to a single bulk operation.
    #[display("duplicate attribute '{name}' on {path}")]
    DuplicateAttribute { path: XmlPath, name: String },
    /// A node was attached to an element other than the one it was created under.
    #[display("{node} is not owned by {owner}")]
    OwnershipViolation { owner: XmlPath, node: XmlPath },
    /// The same child node was listed more than once.
    #[display("{node} is listed more than once as a child of {path}")]
    DuplicateChild { path: XmlPath, node: XmlPath },
    /// A handle that does not resolve to a node of the expected kind.
    #[display("node {_0} does not exist or has an unexpected kind")]
    UnknownNode(NodeId),
    /// A required attribute is absent.
    #[display("no attribute '{name}' on {path}")]
    MissingAttribute { path: XmlPath, name: String },
    /// A single-child accessor matched zero or several nodes.
    #[display("expected exactly one child '{name}' under {path}, found {found}")]
    ChildCount {
        path: XmlPath,
        name: String,
        found: usize,
    },
    /// A single-child accessor matched a node that is not an element.
    #[display("child '{name}' of {path} is not an element")]
    NotAnElement { path: XmlPath, name: String },
    /// Only the text accessor `#` is supported.
    #[display("unsupported child accessor '{_0}', only '#' is supported")]
    UnsupportedAccessor(char),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pattern(e) => Some(e),
            Error::Yaml(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
