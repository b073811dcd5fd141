//! Text- and tree-level analysis shared by completion and hover.
//!
//! [`position`] classifies the syntactic situation at a cursor offset from
//! the raw text alone; [`paths`] derives the dot-qualified shape namespace
//! from a parse result.

pub mod paths;
pub mod position;

pub use paths::{collect_shapes, lookup_path};
pub use position::PositionContext;
