//! Recursive-descent structural parser for D2 documents.
//!
//! The parser is best-effort: malformed input is never an error. Unterminated
//! quoted strings and block comments consume to end-of-input, missing
//! identifiers yield empty placeholders, and every step that fails to
//! recognize a production still advances the cursor by at least one
//! character, so parsing terminates on arbitrary input.
//!
//! Known limitation: container brace matching counts raw `{`/`}` and does not
//! account for braces inside quoted values; a brace inside a quoted label can
//! desynchronize container boundaries.

pub mod node;
pub mod scanner;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::trace;

pub use node::{
    Attribute, Comment, Connection, ConnectionKind, Document, Node, Shape, Span,
};
use node::merge_child_shape;
use scanner::Scanner;

/// Attribute keywords of the D2 language. A scalar statement whose name is
/// one of these describes the enclosing scope rather than declaring a shape.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "shape", "label", "icon", "near", "tooltip", "link", "direction",
    "constraint", "class", "width", "height",
    "grid-rows", "grid-columns", "grid-gap",
    "source-arrowhead", "target-arrowhead",
];

pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

/// Namespace and edge tables accumulated during one parse.
///
/// `shapes` holds the top-level namespace only; nested shapes are reachable
/// through their parent's child list. Redeclaring an identifier merges into
/// the existing record in place, preserving its position in the map.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub shapes: IndexMap<String, Shape>,
    pub connections: Vec<Connection>,
    pub variables: IndexMap<String, String>,
    pub classes: IndexMap<String, IndexMap<String, String>>,
    pub imports: Vec<String>,
}

/// Document tree plus the namespace tables derived from it.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub root: Document,
    pub context: ParseContext,
}

/// Parse a D2 document. Always returns a well-formed result, whatever the
/// input looks like.
pub fn parse(text: &str) -> ParseResult {
    Parser::new(text).run()
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    context: ParseContext,
    len: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
            context: ParseContext::default(),
            len: text.len(),
        }
    }

    fn run(mut self) -> ParseResult {
        let nodes = self.parse_block(false);
        for node in &nodes {
            match node {
                Node::Shape(shape) => self.register_top_level(shape.clone()),
                Node::Attribute(attr) => self.register_attribute(attr),
                _ => {}
            }
        }
        trace!(
            shapes = self.context.shapes.len(),
            connections = self.context.connections.len(),
            "parsed document"
        );
        ParseResult {
            root: Document {
                children: nodes,
                span: Span::new(0, self.len),
            },
            context: self.context,
        }
    }

    /// Statement loop shared by the document root and container bodies.
    /// Shapes redeclared within the block merge into the earlier record;
    /// connection endpoints are registered as zero-attribute shapes.
    fn parse_block(&mut self, stop_at_brace: bool) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.at_end() {
                break;
            }
            if stop_at_brace && self.scanner.peek() == Some('}') {
                break;
            }
            let before = self.scanner.pos();
            if let Some(node) = self.parse_statement() {
                match node {
                    Node::Connection(conn) => {
                        // A connection declares both endpoints. Dotted
                        // endpoints reference existing paths instead.
                        for endpoint in [conn.source.as_str(), conn.target.as_str()] {
                            if !endpoint.is_empty() && !endpoint.contains('.') {
                                merge_child_shape(&mut nodes, Shape::new(endpoint, conn.span));
                            }
                        }
                        self.context.connections.push(conn.clone());
                        nodes.push(Node::Connection(conn));
                    }
                    Node::Shape(shape) => merge_child_shape(&mut nodes, shape),
                    other => nodes.push(other),
                }
            }
            if self.scanner.pos() == before {
                // Unrecognized production: force progress.
                self.scanner.bump();
            }
        }
        nodes
    }

    fn parse_statement(&mut self) -> Option<Node> {
        self.scanner.skip_whitespace();
        if self.scanner.at_end() {
            return None;
        }
        let start = self.scanner.pos();

        if self.scanner.starts_with("\"\"\"") {
            // Unterminated block comments swallow the rest of the document.
            self.scanner.advance(3);
            let (s, e) = self.scanner.consume_through("\"\"\"");
            return Some(Node::Comment(Comment {
                text: self.scanner.slice(s, e).to_string(),
                span: Span::new(start, self.scanner.pos()),
            }));
        }

        if self.scanner.peek() == Some('#') {
            self.scanner.bump();
            let (s, e) = self.scanner.consume_until(|c| c == '\n');
            return Some(Node::Comment(Comment {
                text: self.scanner.slice(s, e).to_string(),
                span: Span::new(start, self.scanner.pos()),
            }));
        }

        if self.scanner.starts_with("...") {
            self.scanner.advance(3);
            let (s, e) = self.scanner.consume_until(|c| c == '\n');
            let import = self.scanner.slice(s, e).trim().to_string();
            if !import.is_empty() {
                self.context.imports.push(import);
            }
            return None;
        }

        let identifier = match self.parse_identifier() {
            Some(ident) => ident,
            None => {
                self.scanner.bump();
                return None;
            }
        };

        if self.scanner.peek() == Some('.') {
            return Some(self.parse_dotted(identifier, start));
        }

        self.scanner.skip_whitespace();

        if let Some(kind) = self.parse_connection_operator() {
            return Some(self.parse_connection(identifier, kind, start));
        }

        if self.scanner.peek() == Some(':') {
            return Some(self.parse_after_colon(identifier, start));
        }

        // Bare identifier: a zero-attribute shape declaration.
        Some(Node::Shape(Shape::new(
            identifier,
            Span::new(start, self.scanner.pos()),
        )))
    }

    /// Parse a quoted or unquoted identifier. Unquoted identifiers may
    /// contain embedded spaces and stop only at a structural character or
    /// the start of a connection operator; trailing whitespace is trimmed.
    fn parse_identifier(&mut self) -> Option<String> {
        self.scanner.skip_whitespace();
        if let Some(quote @ ('"' | '\'')) = self.scanner.peek() {
            return self.parse_quoted_string(quote);
        }

        let start = self.scanner.pos();
        let mut last_non_ws = start;
        while let Some(ch) = self.scanner.peek() {
            if matches!(ch, ':' | '{' | '}' | ';' | '#' | '\n' | '.' | '[' | ']') {
                break;
            }
            if self.scanner.starts_with("<->")
                || self.scanner.starts_with("<-")
                || self.scanner.starts_with("->")
                || self.scanner.starts_with("--")
            {
                break;
            }
            self.scanner.bump();
            if !ch.is_whitespace() {
                last_non_ws = self.scanner.pos();
            }
        }

        if self.scanner.pos() == start {
            return None;
        }
        let text = self.scanner.slice(start, last_non_ws);
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Escape-aware quoted scan: `\` plus the next character are kept as a
    /// literal pair. An unterminated string recovers by taking the remainder
    /// of the input as its content.
    fn parse_quoted_string(&mut self, quote: char) -> Option<String> {
        self.scanner.bump();
        let start = self.scanner.pos();
        loop {
            match self.scanner.peek() {
                None => {
                    return Some(self.scanner.slice(start, self.scanner.pos()).to_string());
                }
                Some('\\') => {
                    self.scanner.bump();
                    self.scanner.bump();
                }
                Some(ch) if ch == quote => {
                    let content = self.scanner.slice(start, self.scanner.pos()).to_string();
                    self.scanner.bump();
                    return Some(content);
                }
                Some(_) => self.scanner.bump(),
            }
        }
    }

    fn parse_connection_operator(&mut self) -> Option<ConnectionKind> {
        const OPERATORS: &[(&str, ConnectionKind)] = &[
            ("<->", ConnectionKind::Bidirectional),
            ("<-", ConnectionKind::ReverseDirected),
            ("->", ConnectionKind::Directed),
            ("--", ConnectionKind::Undirected),
        ];
        for (op, kind) in OPERATORS {
            if self.scanner.starts_with(op) {
                self.scanner.advance(op.len());
                return Some(*kind);
            }
        }
        None
    }

    fn parse_connection(&mut self, source: String, kind: ConnectionKind, start: usize) -> Node {
        self.scanner.skip_whitespace();
        // A missing target recovers as an empty placeholder.
        let target = self.parse_identifier().unwrap_or_default();
        self.skip_inline_whitespace();
        let label = if self.scanner.peek() == Some(':') {
            self.scanner.advance(1);
            let value = self.parse_value();
            if value.is_empty() { None } else { Some(value) }
        } else {
            None
        };
        Node::Connection(Connection {
            source,
            target,
            label,
            kind,
            span: Span::new(start, self.scanner.pos()),
        })
    }

    fn parse_after_colon(&mut self, identifier: String, start: usize) -> Node {
        self.scanner.advance(1);
        self.skip_inline_whitespace();
        if self.scanner.peek() == Some('{') {
            return Node::Shape(self.parse_container(identifier, start));
        }
        let value = self.parse_value();
        Node::Attribute(Attribute {
            name: identifier,
            value,
            span: Span::new(start, self.scanner.pos()),
        })
    }

    /// Dotted statement (`base.path: value` or `base.path: { ... }`). The
    /// dotted name is carried whole; [`Parser::register_attribute`] routes it
    /// onto the base shape's attribute/style tables.
    fn parse_dotted(&mut self, base: String, start: usize) -> Node {
        self.scanner.advance(1);
        let (s, e) = self
            .scanner
            .consume_until(|c| matches!(c, '\n' | ';' | '#' | '{' | '}'));
        let rest = self.scanner.slice(s, e);
        let (suffix, value) = match rest.split_once(':') {
            Some((path, value)) => (path.trim(), value.trim()),
            None => (rest.trim(), ""),
        };
        let name = if suffix.is_empty() {
            base
        } else {
            format!("{base}.{suffix}")
        };

        if value.is_empty() && self.scanner.peek() == Some('{') {
            return Node::Shape(self.parse_container(name, start));
        }
        Node::Attribute(Attribute {
            name,
            value: value.to_string(),
            span: Span::new(start, self.scanner.pos()),
        })
    }

    /// Scalar value: quoted string, `| ... |` content block, or free text up
    /// to a statement terminator, trimmed.
    fn parse_value(&mut self) -> String {
        self.skip_inline_whitespace();
        match self.scanner.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_quoted_string(quote).unwrap_or_default(),
            Some('|') => {
                self.scanner.bump();
                let (s, e) = self.scanner.consume_through("|");
                self.scanner.slice(s, e).trim().to_string()
            }
            _ => {
                let (s, e) = self
                    .scanner
                    .consume_until(|c| matches!(c, '\n' | ';' | '#' | '{' | '}'));
                self.scanner.slice(s, e).trim().to_string()
            }
        }
    }

    /// Container body. The new shape becomes the current container until the
    /// matching `}` or end-of-input. Scalar statements with reserved names
    /// become attributes of the container; a nested `style` container folds
    /// into the styles table; everything else declares a child shape.
    fn parse_container(&mut self, identifier: String, start: usize) -> Shape {
        self.scanner.advance(1);
        let statements = self.parse_block(true);
        if self.scanner.peek() == Some('}') {
            self.scanner.advance(1);
        }

        let mut shape = Shape::new(identifier, Span::new(start, self.scanner.pos()));
        // Inside style/vars bodies every scalar is a property, never a shape.
        let attributes_only = matches!(shape.identifier.as_str(), "style" | "vars")
            || shape.identifier.ends_with(".style");
        for statement in statements {
            match statement {
                Node::Attribute(attr) => {
                    if attributes_only
                        || is_reserved_attribute(&attr.name)
                        || attr.name.contains('.')
                    {
                        shape
                            .attributes
                            .insert(attr.name.clone(), attr.value.clone());
                        shape.children.push(Node::Attribute(attr));
                    } else {
                        // `name: value` declares a child shape labelled by
                        // the scalar.
                        let mut child = Shape::new(attr.name.clone(), attr.span);
                        if !attr.value.is_empty() {
                            child.attributes.insert("label".to_string(), attr.value);
                        }
                        merge_child_shape(&mut shape.children, child);
                    }
                }
                Node::Shape(child) if child.identifier == "style" => {
                    for (key, value) in child.attributes {
                        shape.styles.insert(key, value);
                    }
                }
                Node::Shape(child) => merge_child_shape(&mut shape.children, child),
                other => shape.children.push(other),
            }
        }
        shape
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(ch) = self.scanner.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.scanner.bump();
            } else {
                break;
            }
        }
    }

    /// Register a top-level shape statement into the namespace tables.
    fn register_top_level(&mut self, shape: Shape) {
        match shape.identifier.as_str() {
            "vars" => {
                self.context.variables.extend(shape.attributes);
            }
            "classes" => {
                for class in shape.children.iter().filter_map(Node::as_shape) {
                    let mut table = class.attributes.clone();
                    table.extend(class.styles.clone());
                    self.context.classes.insert(class.identifier.clone(), table);
                }
            }
            ident if ident.contains('.') => self.register_dotted_container(shape),
            _ => self.register_shape(shape),
        }
    }

    fn register_shape(&mut self, shape: Shape) {
        match self.context.shapes.entry(shape.identifier.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().absorb(shape),
            Entry::Vacant(entry) => {
                entry.insert(shape);
            }
        }
    }

    /// `base.style: { ... }` folds into the base shape's styles; any other
    /// dotted container attaches as a nested child of the base shape.
    fn register_dotted_container(&mut self, shape: Shape) {
        let mut segments = shape.identifier.split('.').map(str::trim);
        let Some(base) = segments.next().filter(|s| !s.is_empty()) else {
            return;
        };
        let rest: Vec<String> = segments.map(str::to_string).collect();
        let span = shape.span;
        let entry = self
            .context
            .shapes
            .entry(base.to_string())
            .or_insert_with(|| Shape::new(base, span));
        entry.span = entry.span.merge(span);

        if rest.last().map(String::as_str) == Some("style") {
            for (key, value) in shape.attributes {
                entry.styles.insert(key, value);
            }
        } else if !rest.is_empty() {
            let mut child = shape;
            child.identifier = rest.join(".");
            merge_child_shape(&mut entry.children, child);
        }
    }

    /// Route a top-level scalar statement: reserved names stay document
    /// attributes, dotted names qualify the base shape, anything else
    /// declares a shape labelled by the value.
    fn register_attribute(&mut self, attr: &Attribute) {
        if attr.name.contains('.') {
            self.register_dotted_attribute(attr);
            return;
        }
        if is_reserved_attribute(&attr.name) {
            return;
        }
        let mut shape = Shape::new(attr.name.clone(), attr.span);
        if !attr.value.is_empty() {
            shape
                .attributes
                .insert("label".to_string(), attr.value.clone());
        }
        self.register_shape(shape);
    }

    fn register_dotted_attribute(&mut self, attr: &Attribute) {
        let mut segments = attr.name.split('.').map(str::trim);
        let Some(base) = segments.next().filter(|s| !s.is_empty()) else {
            return;
        };
        let rest: Vec<&str> = segments.collect();
        let span = attr.span;
        let shape = self
            .context
            .shapes
            .entry(base.to_string())
            .or_insert_with(|| Shape::new(base, span));
        shape.span = shape.span.merge(span);

        match rest.as_slice() {
            [] => {}
            ["style", property] => {
                shape
                    .styles
                    .insert(property.to_string(), attr.value.clone());
            }
            [name] => {
                shape.attributes.insert(name.to_string(), attr.value.clone());
            }
            deeper => {
                shape.attributes.insert(deeper.join("."), attr.value.clone());
            }
        }
    }
}
