//! Structural locations of metadata elements.

use std::fmt;
use std::sync::Arc;

use crate::document::Element;

/// Name of the container that wraps a conflict record.
pub const CONFLICT_ELEMENT: &str = "Conflict";

#[derive(Debug, PartialEq, Eq)]
struct PathNode {
    name: String,
    parent: Option<ElementPath>,
}

/// Location of an element inside a metadata document, e.g.
/// `x_tags/Cruise_Info/Vessel`.
///
/// Paths are immutable and reference counted: cloning one shares the
/// underlying chain, which is how every variable parsed from the same
/// section ends up pointing at the same location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPath(Arc<PathNode>);

impl ElementPath {
    /// A top-level path (normally the document root).
    pub fn root(name: impl Into<String>) -> Self {
        Self(Arc::new(PathNode {
            name: name.into(),
            parent: None,
        }))
    }

    /// A path one level below `self`.
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self(Arc::new(PathNode {
            name: name.into(),
            parent: Some(self.clone()),
        }))
    }

    /// Builds a path from `/`-separated segments. Returns `None` for an empty string.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let mut current = Self::root(segments.next()?);
        for segment in segments {
            current = current.child(segment);
        }
        Some(current)
    }

    /// Name of the element this path points at.
    pub fn element_name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ElementPath> {
        self.0.parent.as_ref()
    }

    /// Element names from the root down to this element.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            segments.push(path.element_name());
            current = path.parent();
        }
        segments.reverse();
        segments
    }

    /// True when both handles share the same node.
    pub fn ptr_eq(&self, other: &ElementPath) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Wraps `node` in a `Conflict` element tagged with this path.
    pub fn conflict_container(&self, node: Element) -> Element {
        Element::new(CONFLICT_ELEMENT)
            .with_attribute("path", self.to_string())
            .with_child(node)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))
    }
}
