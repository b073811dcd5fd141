//! Completion assembly and ranking tests
//!
//! These verify that:
//! - Existing-shape candidates land in the documented tier keys
//! - Connection completion excludes the literal source shape
//! - The fuzzy scorer prefers exact and well-anchored matches
//! - The numeric relevance score sets the final order

use d2_completion_engine::analysis::PositionContext;
use d2_completion_engine::completion::ranking::{fuzzy_match_score, shape_tier};
use d2_completion_engine::completion::usage::UsageStats;
use d2_completion_engine::completion::{assemble, Candidate};
use d2_completion_engine::completion::ranking;
use d2_completion_engine::parser::parse;
use indoc::indoc;

fn context_for_line(line: &str) -> PositionContext {
    PositionContext::at(line, line.len())
}

#[test]
fn test_tiers_for_word_server() {
    let source = indoc! {"
        Server: {
          API
          Database
        }
    "};
    let result = parse(source);
    let ctx = context_for_line("Server");
    let candidates = assemble(&ctx, &result.context, true);

    let by_label = |label: &str| -> &Candidate {
        candidates
            .iter()
            .find(|c| c.label == label)
            .unwrap_or_else(|| panic!("candidate {label} missing"))
    };

    let top = by_label("Server");
    assert!(top.sort_text.starts_with("000"), "top-level exact: {}", top.sort_text);
    assert!(top.preselect);

    let api = by_label("Server.API");
    assert!(api.sort_text.starts_with("002"), "first-segment prefix: {}", api.sort_text);
    let database = by_label("Server.Database");
    assert!(database.sort_text.starts_with("002"));

    let phrases: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.detail.starts_with("[Multi-word"))
        .collect();
    assert!(!phrases.is_empty(), "phrase suggestions present");
    assert!(phrases.iter().all(|c| c.sort_text.starts_with('4')));
}

#[test]
fn test_nested_leaf_prefix_is_tier_003_unpreselected() {
    let result = parse("Middle: {\n  Backbone\n}");
    let ctx = context_for_line("Back");
    let candidates = assemble(&ctx, &result.context, true);

    let backbone = candidates
        .iter()
        .find(|c| c.label == "Middle.Backbone")
        .expect("nested shape offered");
    assert!(backbone.sort_text.starts_with("003"), "{}", backbone.sort_text);
    assert!(!backbone.preselect);

    let (tier, preselect) = shape_tier("Middle.Backbone", "Back");
    assert_eq!(tier, "003Middle.Backbone");
    assert!(!preselect);
}

#[test]
fn test_connection_source_excluded_children_remain() {
    let source = indoc! {"
        Container: {
          Child1
        }
        Other
    "};
    let full = format!("{source}Container -> ");
    let result = parse(&full);
    let ctx = PositionContext::at(&full, full.len());
    let candidates = assemble(&ctx, &result.context, true);

    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
    assert!(!labels.contains(&"Container"), "literal source excluded");
    assert!(labels.contains(&"Container.Child1"), "children remain");
    assert!(labels.contains(&"Other"));
}

#[test]
fn test_fuzzy_exact_beats_partial() {
    assert!(fuzzy_match_score("server", "server") > fuzzy_match_score("srvr", "server"));
    assert!(fuzzy_match_score("cylinder", "cylinder") > fuzzy_match_score("cyl", "cylinder"));
}

#[test]
fn test_relevance_orders_exact_match_first() {
    let result = parse("gateway\ngate\ngamma");
    let text = "gateway\ngate\ngamma\ngate";
    let ctx = PositionContext::at(text, text.len());
    let mut candidates = assemble(&ctx, &result.context, true);

    let usage = UsageStats::new();
    ranking::rank(&mut candidates, &ctx.current_word(), &ctx, &usage);
    assert_eq!(candidates[0].label, "gate", "exact label match ranks first");
}

#[test]
fn test_no_word_gives_flat_shape_tier() {
    let result = parse("alpha\nbeta");
    let ctx = context_for_line("");
    let candidates = assemble(&ctx, &result.context, true);
    for c in candidates.iter().filter(|c| c.existing) {
        assert!(c.sort_text.starts_with("02"), "{}: {}", c.label, c.sort_text);
    }
}

#[test]
fn test_filter_text_is_bare_leaf_identifier() {
    let result = parse("outer: {\n  inner\n}");
    let ctx = context_for_line("inn");
    let candidates = assemble(&ctx, &result.context, true);
    let nested = candidates
        .iter()
        .find(|c| c.label == "outer.inner")
        .expect("nested candidate");
    assert_eq!(nested.filter_text.as_deref(), Some("inner"));
}

#[test]
fn test_style_block_offers_style_properties() {
    let text = "server: {\n  style: {\n    ";
    let result = parse(text);
    let ctx = PositionContext::at(text, text.len());
    assert!(ctx.in_style);
    let candidates = assemble(&ctx, &result.context, true);
    assert!(candidates.iter().any(|c| c.label == "stroke-dash"));
    // The style snippet pattern rides along in style context.
    assert!(candidates.iter().any(|c| c.detail == "[Style Pattern]"));
}
