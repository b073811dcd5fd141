//! Completion, hover, and structural analysis engine for the D2 diagram
//! language.
//!
//! The crate is a pure function of (document text, cursor offset, feature
//! flags, usage state) to completion/hover records. It owns no transport:
//! the hosting editor surface delivers text, offsets, and cancellation
//! signals, and renders the [`lsp_types`] records this crate produces.
//!
//! # Architecture
//!
//! ```text
//! text + offset
//!       ├─→ parser::Scanner ─→ parser (document tree + ParseContext)
//!       │                          └─→ analysis::paths (dotted namespace)
//!       ├─→ analysis::position (syntactic context flags)
//!       └─→ completion (candidate assembly) ─→ ranking ─→ ordered items
//!
//! engine::CompletionEngine owns the single-slot parse cache and the
//! usage-learning state shared across queries.
//! ```

pub mod analysis;
pub mod completion;
pub mod engine;
pub mod hover;
pub mod logging;
pub mod metrics;
pub mod parser;

pub use engine::{CancellationToken, CompletionEngine, EngineConfig};
