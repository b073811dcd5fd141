//! Document tree data model for parsed D2 sources.
//!
//! Nodes form a tree owned by value: children live inside their parent, and
//! there are no parent back-pointers. A node either is a [`Shape`] (has an
//! identifier and children) or it is not, decided at construction. Full
//! dotted paths are never stored on nodes; they are derived on demand by
//! [`crate::analysis::paths`].

use indexmap::IndexMap;

/// Half-open `[start, end)` byte-offset range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A parsed statement in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Shape(Shape),
    Connection(Connection),
    Attribute(Attribute),
    Comment(Comment),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Shape(s) => s.span,
            Node::Connection(c) => c.span,
            Node::Attribute(a) => a.span,
            Node::Comment(c) => c.span,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Node::Shape(s) => Some(s),
            _ => None,
        }
    }
}

/// Root of the parse: the whole document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub children: Vec<Node>,
    pub span: Span,
}

/// A named diagram node, optionally a container of further shapes.
///
/// Identifiers are case-sensitive and may contain internal spaces.
/// Attribute and style maps preserve insertion order; redeclaration keeps
/// the original position (last write wins in place).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub identifier: String,
    pub attributes: IndexMap<String, String>,
    pub styles: IndexMap<String, String>,
    pub children: Vec<Node>,
    pub span: Span,
}

impl Shape {
    pub fn new(identifier: impl Into<String>, span: Span) -> Self {
        Self {
            identifier: identifier.into(),
            span,
            ..Default::default()
        }
    }

    /// Direct child shapes, in declaration order.
    pub fn child_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.children.iter().filter_map(Node::as_shape)
    }

    /// Direct child shape by identifier.
    pub fn child_shape(&self, identifier: &str) -> Option<&Shape> {
        self.child_shapes().find(|s| s.identifier == identifier)
    }

    /// Fold a redeclaration of the same identifier into this record,
    /// preserving this record's position in its scope.
    pub fn absorb(&mut self, other: Shape) {
        self.span = self.span.merge(other.span);
        self.attributes.extend(other.attributes);
        self.styles.extend(other.styles);
        for child in other.children {
            match child {
                Node::Shape(shape) => merge_child_shape(&mut self.children, shape),
                other => self.children.push(other),
            }
        }
    }
}

/// Insert a shape into a child list, merging with an existing direct child
/// of the same identifier instead of creating a duplicate entry.
pub(crate) fn merge_child_shape(children: &mut Vec<Node>, shape: Shape) {
    let existing = children.iter_mut().find_map(|node| match node {
        Node::Shape(s) if s.identifier == shape.identifier => Some(s),
        _ => None,
    });
    match existing {
        Some(s) => s.absorb(shape),
        None => children.push(Node::Shape(shape)),
    }
}

/// Directed or undirected edge between two identifiers or dotted paths.
/// The parser does not distinguish flat identifiers from paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub kind: ConnectionKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// `->`
    Directed,
    /// `<-`
    ReverseDirected,
    /// `<->`
    Bidirectional,
    /// `--`
    Undirected,
}

impl ConnectionKind {
    pub fn operator(self) -> &'static str {
        match self {
            ConnectionKind::Directed => "->",
            ConnectionKind::ReverseDirected => "<-",
            ConnectionKind::Bidirectional => "<->",
            ConnectionKind::Undirected => "--",
        }
    }
}

/// A `name: value` statement with a scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub span: Span,
}

/// Line (`# ...`) or block (`""" ... """`) comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_widens() {
        let a = Span::new(4, 10);
        let b = Span::new(2, 6);
        assert_eq!(a.merge(b), Span::new(2, 10));
    }

    #[test]
    fn absorb_keeps_identity_and_merges_children() {
        let mut first = Shape::new("server", Span::new(0, 10));
        first.attributes.insert("label".into(), "old".into());

        let mut redecl = Shape::new("server", Span::new(20, 40));
        redecl.attributes.insert("label".into(), "new".into());
        redecl.children.push(Node::Shape(Shape::new("api", Span::new(25, 28))));

        first.absorb(redecl);
        assert_eq!(first.span, Span::new(0, 40));
        assert_eq!(first.attributes.get("label").map(String::as_str), Some("new"));
        assert!(first.child_shape("api").is_some());
    }

    #[test]
    fn merge_child_shape_deduplicates() {
        let mut children = Vec::new();
        merge_child_shape(&mut children, Shape::new("db", Span::new(0, 2)));
        merge_child_shape(&mut children, Shape::new("db", Span::new(5, 9)));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].span(), Span::new(0, 9));
    }
}
