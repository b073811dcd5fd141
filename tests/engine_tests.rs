//! End-to-end engine tests
//!
//! These verify that:
//! - The parse cache returns the identical context for unchanged text
//! - Cancelled queries come back empty instead of erroring
//! - Accepted selections reorder later completions and earn the star mark
//! - Hover reaches document-defined shapes through the engine surface

use std::sync::Arc;

use d2_completion_engine::{CancellationToken, CompletionEngine, EngineConfig};
use lsp_types::HoverContents;

#[test]
fn test_unchanged_text_reuses_parsed_context() {
    let engine = CompletionEngine::default();
    let first = engine.parse_document("a -> b");
    let second = engine.parse_document("a -> b");
    assert!(
        Arc::ptr_eq(&first, &second),
        "identical text within the TTL must not reparse"
    );

    let edited = engine.parse_document("a -> b\nc");
    assert!(!Arc::ptr_eq(&first, &edited), "any edit forces a reparse");
}

#[test]
fn test_cancelled_query_returns_empty() {
    let engine = CompletionEngine::default();
    let token = CancellationToken::new();
    token.cancel();
    let items = engine.completions("server\nser", 10, &token);
    assert!(items.is_empty());
}

#[test]
fn test_live_token_returns_candidates() {
    let engine = CompletionEngine::default();
    let items = engine.completions("server\nser", 10, &CancellationToken::new());
    assert!(items.iter().any(|i| i.label == "server"));
}

#[test]
fn test_selection_learning_reorders_and_stars() {
    let engine = CompletionEngine::default();
    let text = "shape: ";
    let token = CancellationToken::new();

    let before = engine.completions(text, text.len(), &token);
    assert_eq!(before[0].label, "square", "catalog order before any usage");

    // Past the frequency threshold "queue" also earns the star mark.
    for _ in 0..6 {
        engine.record_selection("queue");
    }

    let after = engine.completions(text, text.len(), &token);
    assert_eq!(after[0].label, "queue", "learned selection ranks first");
    assert_eq!(after[0].preselect, Some(true), "recent selections preselect");
    assert!(
        after[0].detail.as_deref().unwrap_or_default().ends_with('★'),
        "frequent selections carry the star mark"
    );
}

#[test]
fn test_hover_reaches_document_shapes() {
    let engine = CompletionEngine::default();
    let text = "api: {\n  v1\n}\nclient -> api";
    let hover = engine.hover(text, 1).expect("hover on api");
    let HoverContents::Markup(markup) = hover.contents else {
        panic!("markdown hover expected");
    };
    assert!(markup.value.contains("Path: `api`"));
}
