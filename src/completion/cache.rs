//! Single-slot, time-bounded memo of the last parse.
//!
//! A hit requires byte-for-byte text equality and an entry younger than the
//! TTL. Any text change is a guaranteed miss; the cache only short-circuits
//! rapid repeated queries against an unchanged document.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::parser::ParseContext;

pub const CACHE_TTL: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
pub struct ParseCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    text: String,
    context: Arc<ParseContext>,
    captured_at: Instant,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<Arc<ParseContext>> {
        let entry = self.entry.as_ref()?;
        if entry.text == text && entry.captured_at.elapsed() < CACHE_TTL {
            trace!("parse cache hit");
            Some(Arc::clone(&entry.context))
        } else {
            None
        }
    }

    /// Replace the single slot.
    pub fn store(&mut self, text: &str, context: Arc<ParseContext>) {
        self.entry = Some(CacheEntry {
            text: text.to_string(),
            context,
            captured_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn hit_requires_exact_text() {
        let mut cache = ParseCache::new();
        let ctx = Arc::new(parse("a -> b").context);
        cache.store("a -> b", Arc::clone(&ctx));

        let hit = cache.get("a -> b").unwrap();
        assert!(Arc::ptr_eq(&hit, &ctx));
        assert!(cache.get("a -> b ").is_none());
        assert!(cache.get("a -> c").is_none());
    }

    #[test]
    fn store_replaces_single_slot() {
        let mut cache = ParseCache::new();
        let first = Arc::new(parse("a").context);
        let second = Arc::new(parse("b").context);
        cache.store("a", first);
        cache.store("b", Arc::clone(&second));
        assert!(cache.get("a").is_none());
        assert!(Arc::ptr_eq(&cache.get("b").unwrap(), &second));
    }
}
