//! The long-lived engine object owning all cross-query state.
//!
//! One `CompletionEngine` lives per editing session. It owns the single-slot
//! parse cache and the usage-learning state; both sit behind mutexes so a
//! host distributing queries across threads keeps the at-most-one-slot and
//! MRU invariants. Queries themselves are synchronous and never block on
//! I/O. A cancellation token is checked between coarse phases; cancelled
//! queries return empty results, never errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lsp_types::{CompletionItem, Hover};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::PositionContext;
use crate::completion::{self, cache::ParseCache, usage::UsageStats};
use crate::hover;
use crate::metrics::{metrics, TimingGuard};
use crate::parser::{self, ParseContext};

/// Queries slower than this are reported, not aborted.
pub const SOFT_LATENCY_TARGET: Duration = Duration::from_millis(200);

/// Host-provided feature flags. Everything defaults to enabled; hosts hand
/// this over as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub completion_enabled: bool,
    pub hover_enabled: bool,
    /// Offer multi-word phrase suggestions ("database server", ...).
    pub multi_word_phrases: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            completion_enabled: true,
            hover_enabled: true,
            multi_word_phrases: true,
        }
    }
}

/// Cooperative cancellation signal. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Completion, hover, and parse entry points over one editing session.
pub struct CompletionEngine {
    config: EngineConfig,
    cache: Mutex<ParseCache>,
    usage: Mutex<UsageStats>,
}

impl CompletionEngine {
    /// Engine with an empty cache and empty usage state.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(ParseCache::new()),
            usage: Mutex::new(UsageStats::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cache-aware parse. Byte-identical text within the cache TTL returns
    /// the stored context without reparsing.
    pub fn parse_document(&self, text: &str) -> Arc<ParseContext> {
        let mut cache = self.cache.lock();
        if let Some(context) = cache.get(text) {
            metrics().record_parse_cache_hit();
            return context;
        }
        metrics().record_parse_cache_miss();
        let context = Arc::new(parser::parse(text).context);
        cache.store(text, Arc::clone(&context));
        context
    }

    /// Ranked completion candidates at `offset`.
    pub fn completions(
        &self,
        text: &str,
        offset: usize,
        token: &CancellationToken,
    ) -> Vec<CompletionItem> {
        if !self.config.completion_enabled {
            return Vec::new();
        }
        metrics().record_completion();
        let timing = TimingGuard::new("completion");

        if self.check_cancelled(token) {
            return Vec::new();
        }
        let parse = self.parse_document(text);

        if self.check_cancelled(token) {
            return Vec::new();
        }
        let ctx = PositionContext::at(text, offset);

        if self.check_cancelled(token) {
            return Vec::new();
        }
        let mut candidates = completion::assemble(&ctx, &parse, self.config.multi_word_phrases);

        if self.check_cancelled(token) {
            return Vec::new();
        }
        let word = ctx.current_word();
        {
            let usage = self.usage.lock();
            completion::ranking::rank(&mut candidates, &word, &ctx, &usage);
            completion::apply_usage_marks(&mut candidates, &usage);
        }

        let elapsed = timing.elapsed();
        if elapsed > SOFT_LATENCY_TARGET {
            warn!(elapsed_ms = elapsed.as_millis() as u64, "completion exceeded soft latency target");
            metrics().record_slow_query();
        }
        debug!(count = candidates.len(), "completion query finished");

        candidates
            .into_iter()
            .map(completion::Candidate::into_completion_item)
            .collect()
    }

    /// Documentation for the word at `offset`, behind the hover flag.
    pub fn hover(&self, text: &str, offset: usize) -> Option<Hover> {
        if !self.config.hover_enabled {
            return None;
        }
        metrics().record_hover();
        let _timing = TimingGuard::new("hover");
        let parse = self.parse_document(text);
        hover::hover(text, offset, &parse)
    }

    /// Host callback for an accepted candidate.
    pub fn record_selection(&self, label: &str) {
        self.usage.lock().record(label);
    }

    fn check_cancelled(&self, token: &CancellationToken) -> bool {
        if token.is_cancelled() {
            debug!("query cancelled");
            metrics().record_cancelled_query();
            true
        } else {
            false
        }
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
