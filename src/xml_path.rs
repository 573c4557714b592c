use std::fmt;
use string_cache::DefaultAtom as Atom;

/// Slash-separated location of a node, e.g. `/catalog/book/@id`.
///
/// The document node itself renders as `/`. Attribute segments carry an `@`
/// prefix and text segments are the reserved `#text` marker. Paths are
/// produced by documents and builders from parent links; they are not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct XmlPath {
    parts: Vec<Atom>,
}

impl XmlPath {
    /// `parts` run from the document element down to the node.
    pub(crate) fn from_parts(parts: Vec<Atom>) -> Self {
        Self { parts }
    }
}

impl fmt::Display for XmlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return f.write_str("/");
        }
        for part in &self.parts {
            write!(f, "/{part}")?;
        }
        Ok(())
    }
}
