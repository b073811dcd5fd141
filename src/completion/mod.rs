//! Completion candidate assembly.
//!
//! Turns a position context plus the parsed namespace into a raw candidate
//! set, which [`ranking`] then orders. Branch precedence mirrors how the
//! language reads: connection tail, dot access, property value, style block,
//! then the open default context.

pub mod cache;
pub mod data;
pub mod ranking;
pub mod usage;

use indexmap::IndexMap;
use lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, MarkupContent,
    MarkupKind,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::analysis::{collect_shapes, lookup_path, PositionContext};
use crate::completion::data::CatalogItem;
use crate::completion::usage::UsageStats;
use crate::parser::{ParseContext, Shape};

static CONNECTION_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*[-<>]+\s*$").unwrap());
static DOT_BASE_AFTER_OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*?[-<>]+\s*(.*)$").unwrap());
static DOT_BASE_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[:;]\s*)([^:;]*)$").unwrap());
static WORD_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+\s*$").unwrap());

/// One completion candidate before final ordering.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: String,
    pub documentation: Option<String>,
    pub insert_text: Option<String>,
    /// Categorical sort key (stable display grouping).
    pub sort_text: String,
    /// Distinct filter string, so a qualified path still filters by its
    /// bare leaf name.
    pub filter_text: Option<String>,
    pub preselect: bool,
    /// Provenance tag: derived from an element of the current document.
    pub existing: bool,
}

impl Candidate {
    fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            label: item.label.to_string(),
            kind: item.kind,
            detail: item.detail.to_string(),
            documentation: Some(item.documentation.to_string()),
            insert_text: item.insert_text.map(str::to_string),
            sort_text: item.sort_text.to_string(),
            filter_text: None,
            preselect: false,
            existing: false,
        }
    }

    fn with_sort_prefix(mut self, prefix: &str) -> Self {
        self.sort_text = format!("{prefix}{}", self.sort_text);
        self
    }

    pub fn into_completion_item(self) -> CompletionItem {
        let insert_text_format = self
            .insert_text
            .as_deref()
            .filter(|t| t.contains("$0"))
            .map(|_| InsertTextFormat::SNIPPET);
        CompletionItem {
            label: self.label,
            kind: Some(self.kind),
            detail: Some(self.detail),
            documentation: self.documentation.map(|value| {
                Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value,
                })
            }),
            insert_text: self.insert_text,
            insert_text_format,
            sort_text: Some(self.sort_text),
            filter_text: self.filter_text,
            preselect: if self.preselect { Some(true) } else { None },
            ..Default::default()
        }
    }
}

/// Build the raw candidate set for one query. Comments suppress completion
/// entirely; the dot branch returns its candidates alone.
pub fn assemble(
    ctx: &PositionContext,
    parse: &ParseContext,
    phrases_enabled: bool,
) -> Vec<Candidate> {
    if ctx.in_comment {
        return Vec::new();
    }

    let word = ctx.current_word();
    let trimmed = ctx.line_prefix.trim();
    let mut candidates: Vec<Candidate> = Vec::new();

    if ctx.in_connection {
        candidates.extend(shape_candidates(&parse.shapes, trimmed, &word));
        if phrases_enabled {
            candidates.extend(phrase_candidates(&word));
        }
    } else if ctx.after_dot || ctx.line_prefix.contains('.') {
        // Dot access stands alone; no pattern suggestions here.
        return dot_candidates(&ctx.line_prefix, &parse.shapes);
    } else if ctx.after_colon || ctx.property_prefix().is_some() {
        if let Some((property, _partial)) = ctx.property_prefix() {
            candidates.extend(
                data::items_for_property(&property, ctx.in_style)
                    .into_iter()
                    .map(Candidate::from_catalog),
            );
            if property == "near" {
                candidates.extend(shape_candidates(&parse.shapes, "", &word));
            }
        }
    } else if ctx.in_style {
        candidates.extend(data::STYLE_PROPERTIES.iter().map(Candidate::from_catalog));
    } else {
        default_candidates(ctx, parse, &word, trimmed, phrases_enabled, &mut candidates);
    }

    candidates.extend(pattern_suggestions(ctx, &parse.shapes));
    debug!(count = candidates.len(), word = %word, "assembled candidates");
    candidates
}

fn default_candidates(
    ctx: &PositionContext,
    parse: &ParseContext,
    word: &str,
    trimmed: &str,
    phrases_enabled: bool,
    candidates: &mut Vec<Candidate>,
) {
    candidates.extend(shape_candidates(&parse.shapes, "", word));

    // Typing a name no shape has yet: offer to create it.
    if !word.is_empty() {
        let exact_exists = parse
            .shapes
            .keys()
            .any(|key| key.eq_ignore_ascii_case(word));
        if !exact_exists {
            candidates.push(Candidate {
                label: word.to_string(),
                kind: CompletionItemKind::TEXT,
                detail: "[New Shape]".to_string(),
                documentation: Some(format!("Create new shape: {word}")),
                insert_text: None,
                sort_text: format!("1{word}"),
                filter_text: None,
                preselect: false,
                existing: false,
            });
        }
    }

    candidates.extend(
        data::KEYWORDS
            .iter()
            .map(|i| Candidate::from_catalog(i).with_sort_prefix("2")),
    );

    if WORD_TAIL.is_match(&ctx.line_prefix) {
        candidates.extend(
            data::CONNECTION_OPERATORS
                .iter()
                .map(|i| Candidate::from_catalog(i).with_sort_prefix("3")),
        );
    }

    if phrases_enabled {
        candidates.extend(phrase_candidates(word));
    }

    if trimmed.is_empty() {
        candidates.extend(
            data::SPECIAL_BLOCKS
                .iter()
                .map(|i| Candidate::from_catalog(i).with_sort_prefix("5")),
        );
    }
}

/// Multi-word phrase suggestions, substring-gated once a word is typed.
fn phrase_candidates(word: &str) -> Vec<Candidate> {
    let word_lower = word.to_lowercase();
    data::MULTI_WORD_PHRASES
        .iter()
        .filter(|item| word.is_empty() || item.label.to_lowercase().contains(&word_lower))
        .map(|item| {
            let mut c = Candidate::from_catalog(item).with_sort_prefix("4");
            c.filter_text = Some(item.label.to_string());
            c
        })
        .collect()
}

/// Existing-shape candidates over the whole dotted namespace, filtered by
/// the typed word and tiered by match quality. When `preceding` ends in a
/// connection operator, the connection's literal source is excluded (a shape
/// should not connect to itself), though its qualified children remain.
fn shape_candidates(
    shapes: &IndexMap<String, Shape>,
    preceding: &str,
    word: &str,
) -> Vec<Candidate> {
    let connection_source: Option<String> = CONNECTION_SOURCE
        .captures(preceding)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    let word_lower = word.to_lowercase();

    collect_shapes(shapes)
        .into_iter()
        .filter_map(|(path, shape)| {
            if connection_source.as_deref() == Some(path.as_str()) {
                return None;
            }
            if !word.is_empty() {
                let ident_matches = shape.identifier.to_lowercase().contains(&word_lower);
                let first_segment = path.split('.').next().unwrap_or(&path);
                let first_matches = first_segment.to_lowercase().contains(&word_lower);
                if !ident_matches && !first_matches {
                    return None;
                }
            }

            let (sort_text, preselect) = ranking::shape_tier(&path, word);
            let detail = match path.rfind('.') {
                Some(idx) => {
                    let parent_leaf = path[..idx].rsplit('.').next().unwrap_or(&path[..idx]);
                    format!("[Existing Shape in {parent_leaf}]")
                }
                None => "[Existing Shape]".to_string(),
            };
            Some(Candidate {
                label: path.clone(),
                kind: CompletionItemKind::VARIABLE,
                detail,
                documentation: Some(format!("Reference to existing shape: {path}")),
                insert_text: None,
                sort_text,
                filter_text: Some(shape.identifier.clone()),
                preselect,
                existing: true,
            })
        })
        .collect()
}

/// Completions after `base.`: resolved child shapes first, then `style`,
/// then the common shape properties.
fn dot_candidates(line_prefix: &str, shapes: &IndexMap<String, Shape>) -> Vec<Candidate> {
    let Some(last_dot) = line_prefix.rfind('.') else {
        return Vec::new();
    };
    let before_dot = &line_prefix[..last_dot];

    let base = if let Some(c) = DOT_BASE_AFTER_OPERATOR.captures(before_dot) {
        c.get(1).map_or("", |m| m.as_str()).trim().to_string()
    } else if let Some(c) = DOT_BASE_STATEMENT.captures(before_dot) {
        c.get(1).map_or("", |m| m.as_str()).trim().to_string()
    } else {
        before_dot.trim().to_string()
    };

    if base == "style" || base.ends_with(".style") {
        return data::STYLE_PROPERTIES
            .iter()
            .map(Candidate::from_catalog)
            .collect();
    }

    let mut items = Vec::new();
    let Some(shape) = lookup_path(shapes, &base) else {
        return items;
    };

    for child in shape.child_shapes() {
        items.push(Candidate {
            label: child.identifier.clone(),
            kind: CompletionItemKind::VARIABLE,
            detail: "[Existing Nested Shape]".to_string(),
            documentation: None,
            insert_text: None,
            sort_text: format!("0000{}", child.identifier),
            filter_text: None,
            preselect: true,
            existing: true,
        });
    }

    items.push(Candidate {
        label: "style".to_string(),
        kind: CompletionItemKind::PROPERTY,
        detail: "[Property]".to_string(),
        documentation: Some("Access style properties".to_string()),
        insert_text: Some("style".to_string()),
        sort_text: "0001".to_string(),
        filter_text: None,
        preselect: false,
        existing: false,
    });

    const COMMON_PROPERTIES: &[&str] = &["shape", "label", "icon", "tooltip", "link", "near"];
    for (index, prop) in COMMON_PROPERTIES.iter().enumerate() {
        items.push(Candidate {
            label: (*prop).to_string(),
            kind: CompletionItemKind::PROPERTY,
            detail: "[Property]".to_string(),
            documentation: None,
            insert_text: Some(format!("{prop}: ")),
            sort_text: format!("0002{index}"),
            filter_text: None,
            preselect: false,
            existing: false,
        });
    }
    items
}

/// Architectural pattern snippets keyed off the current namespace, plus a
/// style snippet inside style blocks.
fn pattern_suggestions(
    ctx: &PositionContext,
    shapes: &IndexMap<String, Shape>,
) -> Vec<Candidate> {
    let mut suggestions = Vec::new();

    if shapes.contains_key("client") && !shapes.contains_key("server") {
        suggestions.push(Candidate {
            label: "server".to_string(),
            kind: CompletionItemKind::SNIPPET,
            detail: "[Pattern Suggestion]".to_string(),
            documentation: Some("Complete client-server architecture".to_string()),
            insert_text: Some(
                "server: {\n\tshape: cylinder\n}\nclient -> server: request".to_string(),
            ),
            sort_text: "7server".to_string(),
            filter_text: None,
            preselect: true,
            existing: false,
        });
    }

    if shapes.contains_key("database") && !shapes.contains_key("cache") {
        suggestions.push(Candidate {
            label: "cache".to_string(),
            kind: CompletionItemKind::SNIPPET,
            detail: "[Pattern Suggestion]".to_string(),
            documentation: Some("Add caching layer".to_string()),
            insert_text: Some("cache: {\n\tshape: hexagon\n\tstyle.fill: orange\n}".to_string()),
            sort_text: "7cache".to_string(),
            filter_text: None,
            preselect: false,
            existing: false,
        });
    }

    if ctx.in_style {
        suggestions.push(Candidate {
            label: "modern-style".to_string(),
            kind: CompletionItemKind::SNIPPET,
            detail: "[Style Pattern]".to_string(),
            documentation: Some("Apply modern styling".to_string()),
            insert_text: Some(
                "fill: #2563eb\nstroke: #1e40af\nstroke-width: 2\nshadow: true\nborder-radius: 8"
                    .to_string(),
            ),
            sort_text: "7modern-style".to_string(),
            filter_text: None,
            preselect: false,
            existing: false,
        });
    }

    suggestions
}

/// Fold live usage signals into the final list: recently accepted labels are
/// preselected, frequently accepted ones get a star on their detail.
pub fn apply_usage_marks(candidates: &mut [Candidate], usage: &UsageStats) {
    for candidate in candidates {
        if usage.is_recent(&candidate.label) {
            candidate.preselect = true;
        }
        if usage.is_frequent(&candidate.label) {
            candidate.detail.push_str(" ★");
        }
    }
}
