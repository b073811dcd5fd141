//! Dot-qualified shape namespace derived from a parse.
//!
//! Paths are never stored on tree nodes; this module threads them downward
//! during a pre-order walk. Dots only ever separate whole identifiers, so
//! multi-word identifiers pass through unchanged (`Load Balancer.api`).

use indexmap::IndexMap;

use crate::parser::Shape;

/// Pre-order enumeration of every shape reachable from the top-level
/// namespace, each paired with its dot-joined path.
pub fn collect_shapes(shapes: &IndexMap<String, Shape>) -> Vec<(String, &Shape)> {
    let mut out = Vec::new();
    for shape in shapes.values() {
        walk(shape, None, &mut out);
    }
    out
}

fn walk<'a>(shape: &'a Shape, parent_path: Option<&str>, out: &mut Vec<(String, &'a Shape)>) {
    let path = match parent_path {
        Some(parent) => format!("{parent}.{}", shape.identifier),
        None => shape.identifier.clone(),
    };
    out.push((path.clone(), shape));
    for child in shape.child_shapes() {
        walk(child, Some(&path), out);
    }
}

/// Point lookup of a dotted path, walking segment by segment through child
/// scopes. Fails on the first absent segment; no fuzzy matching here.
pub fn lookup_path<'a>(shapes: &'a IndexMap<String, Shape>, path: &str) -> Option<&'a Shape> {
    let mut segments = path.split('.').map(str::trim);
    let first = segments.next()?;
    let mut current = shapes.get(first)?;
    for segment in segments {
        current = current.child_shape(segment)?;
    }
    Some(current)
}
