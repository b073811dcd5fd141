//! Candidate ordering: categorical tier keys, subsequence fuzzy matching,
//! and the numeric relevance score.
//!
//! The two mechanisms are intentionally separate. The tier key is a stable
//! lexicographic string the host can use for display grouping; the numeric
//! score (which folds in fuzzy matching and live usage signals) decides the
//! final array order and therefore the first/highlighted item.

use lsp_types::CompletionItemKind;

use crate::analysis::PositionContext;
use crate::completion::usage::UsageStats;
use crate::completion::Candidate;

/// Tier key and preselect flag for an existing-shape candidate, derived from
/// the typed word against the shape's qualified path.
pub fn shape_tier(path: &str, word: &str) -> (String, bool) {
    if word.is_empty() {
        // No typed word: flat mid-tier for all existing shapes.
        return (format!("02{path}"), false);
    }

    let word_lower = word.to_lowercase();
    let leaf = path.rsplit('.').next().unwrap_or(path);
    let leaf_lower = leaf.to_lowercase();
    let first_segment = path.split('.').next().unwrap_or(path);
    let first_lower = first_segment.to_lowercase();
    let top_level = !path.contains('.');

    let (tier, preselect) = if top_level && leaf_lower == word_lower {
        ("000", true)
    } else if top_level && leaf_lower.starts_with(&word_lower) {
        ("001", true)
    } else if !top_level && first_lower.starts_with(&word_lower) {
        ("002", first_lower == word_lower)
    } else if !top_level && leaf_lower.starts_with(&word_lower) {
        ("003", false)
    } else if top_level && leaf_lower.contains(&word_lower) {
        ("004", false)
    } else if leaf_lower.contains(&word_lower) {
        ("005", false)
    } else if first_lower.contains(&word_lower) {
        ("006", false)
    } else {
        // Callers filter non-matching shapes out before tiering; keep a
        // defined key for any that slip through.
        ("007", false)
    };
    (format!("{tier}{path}"), preselect)
}

/// Subsequence fuzzy match of `pattern` against `text`.
///
/// Case-insensitive scan, +10 per matched character, +15 for a consecutive
/// run, +20 at a word boundary (text start, after a space, or a lower-to-
/// upper transition), and a +50 completion bonus plus a shortness bonus when
/// the whole pattern is consumed. Empty patterns score 0.
pub fn fuzzy_match_score(pattern: &str, text: &str) -> i64 {
    if pattern.is_empty() {
        return 0;
    }

    let text_chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let mut score = 0i64;
    let mut pattern_idx = 0usize;
    let mut prev_match: Option<usize> = None;

    for (i, &ch) in text_chars.iter().enumerate() {
        if pattern_idx >= pattern_chars.len() {
            break;
        }
        if !chars_eq_ci(ch, pattern_chars[pattern_idx]) {
            continue;
        }
        if i > 0 && prev_match == Some(i - 1) {
            score += 15;
        }
        let boundary = i == 0
            || text_chars[i - 1] == ' '
            || (!ch.is_lowercase() && text_chars[i - 1].is_lowercase());
        if boundary {
            score += 20;
        }
        score += 10;
        prev_match = Some(i);
        pattern_idx += 1;
    }

    if pattern_idx == pattern_chars.len() {
        score += 50;
        score += (30 - (text_chars.len() as i64 - pattern_chars.len() as i64)).max(0);
    }
    score
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Numeric relevance of one candidate against the typed word, context, and
/// usage state. Higher is better.
pub fn relevance_score(
    candidate: &Candidate,
    word: &str,
    ctx: &PositionContext,
    usage: &UsageStats,
) -> i64 {
    let mut score = 100i64;
    let label = candidate.label.as_str();

    if label == word {
        score += 1000;
    }
    if !word.is_empty() && label.starts_with(word) {
        score += 500;
    }
    if !word.is_empty() && label.to_lowercase().starts_with(&word.to_lowercase()) {
        score += 300;
    }

    score += fuzzy_match_score(word, label);

    if ctx.in_style && candidate.detail.starts_with("[Style") {
        score += 200;
    }
    if ctx.after_colon && candidate.kind == CompletionItemKind::VALUE {
        score += 150;
    }

    score += i64::from(usage.frequency(label)) * 10;
    if let Some(rank) = usage.recency_rank(label) {
        score += (super::usage::MAX_RECENT as i64 - rank as i64) * 20;
    }

    score += match candidate.kind {
        CompletionItemKind::KEYWORD => 50,
        CompletionItemKind::PROPERTY => 40,
        CompletionItemKind::VALUE => 30,
        CompletionItemKind::VARIABLE => {
            if candidate.existing {
                200
            } else {
                35
            }
        }
        _ => 0,
    };

    score
}

/// Order candidates by descending relevance. The sort is stable so the
/// categorical key keeps deciding ties.
pub fn rank(
    candidates: &mut [Candidate],
    word: &str,
    ctx: &PositionContext,
    usage: &UsageStats,
) {
    candidates.sort_by_key(|c| std::cmp::Reverse(relevance_score(c, word, ctx, usage)));
}
