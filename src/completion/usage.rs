//! Session-lived usage learning: per-label selection counts plus a bounded
//! most-recently-used list. Never persisted.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

/// Bound on the MRU list.
pub const MAX_RECENT: usize = 10;

/// Selections exceeding this count earn a star on the candidate detail.
pub const FREQUENT_THRESHOLD: u32 = 5;

#[derive(Debug, Default)]
pub struct UsageStats {
    frequency: FxHashMap<String, u32>,
    recent: VecDeque<String>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted candidate: bump its count and move it to the front
    /// of the MRU list, evicting the oldest entry past the bound.
    pub fn record(&mut self, label: &str) {
        let count = self.frequency.entry(label.to_string()).or_insert(0);
        *count += 1;
        debug!(label, count = *count, "recorded selection");

        self.recent.retain(|l| l != label);
        self.recent.push_front(label.to_string());
        while self.recent.len() > MAX_RECENT {
            self.recent.pop_back();
        }
    }

    pub fn frequency(&self, label: &str) -> u32 {
        self.frequency.get(label).copied().unwrap_or(0)
    }

    pub fn is_frequent(&self, label: &str) -> bool {
        self.frequency(label) > FREQUENT_THRESHOLD
    }

    /// Position in the MRU list, 0 = most recent.
    pub fn recency_rank(&self, label: &str) -> Option<usize> {
        self.recent.iter().position(|l| l == label)
    }

    pub fn is_recent(&self, label: &str) -> bool {
        self.recency_rank(label).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_bumps_frequency_and_mru_front() {
        let mut usage = UsageStats::new();
        usage.record("server");
        usage.record("client");
        usage.record("server");
        assert_eq!(usage.frequency("server"), 2);
        assert_eq!(usage.recency_rank("server"), Some(0));
        assert_eq!(usage.recency_rank("client"), Some(1));
    }

    #[test]
    fn mru_evicts_past_bound() {
        let mut usage = UsageStats::new();
        for i in 0..(MAX_RECENT + 3) {
            usage.record(&format!("label{i}"));
        }
        assert!(!usage.is_recent("label0"));
        assert!(usage.is_recent(&format!("label{}", MAX_RECENT + 2)));
        assert_eq!(usage.recency_rank(&format!("label{}", MAX_RECENT + 2)), Some(0));
        // Evicted labels keep their counts.
        assert_eq!(usage.frequency("label0"), 1);
    }

    #[test]
    fn frequent_threshold() {
        let mut usage = UsageStats::new();
        for _ in 0..5 {
            usage.record("fill");
        }
        assert!(!usage.is_frequent("fill"));
        usage.record("fill");
        assert!(usage.is_frequent("fill"));
    }
}
