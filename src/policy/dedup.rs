// * Repeated-segment filter driven by the Deduplication settings.
// * Discards text blocks seen more than MAX_REPETITIONS times, ignoring
// * blocks shorter than MIN_DUPLCHECK_SIZE.

use crate::config::DedupSettings;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use xxhash_rust::xxh64::xxh64;

// * Bound on tracked segment fingerprints; oldest entries are evicted first
const SEEN_CAPACITY: usize = 4096;

/// Tracks segment occurrence counts by xxh64 fingerprint.
pub struct RepetitionFilter {
    min_len: usize,
    max_repetitions: u64,
    counts: HashMap<u64, u64>,
    order: VecDeque<u64>,
    capacity: usize,
}

impl RepetitionFilter {
    pub fn from_settings(dedup: &DedupSettings) -> Self {
        Self::with_capacity(dedup, SEEN_CAPACITY)
    }

    pub fn with_capacity(dedup: &DedupSettings, capacity: usize) -> Self {
        Self {
            min_len: dedup.min_duplcheck_size as usize,
            max_repetitions: dedup.max_repetitions,
            counts: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records the segment and reports whether it exceeded the repetition
    /// budget. Segments below the size threshold are never flagged.
    pub fn is_repeated(&mut self, segment: &str) -> bool {
        if segment.len() < self.min_len {
            return false;
        }

        let fingerprint = xxh64(normalize(segment).as_bytes(), 0);
        match self.counts.entry(fingerprint) {
            Entry::Occupied(mut slot) => {
                let seen = *slot.get();
                *slot.get_mut() = seen + 1;
                seen >= self.max_repetitions
            }
            Entry::Vacant(slot) => {
                slot.insert(1);
                self.order.push_back(fingerprint);
                if self.order.len() > self.capacity {
                    if let Some(evicted) = self.order.pop_front() {
                        self.counts.remove(&evicted);
                    }
                }
                false
            }
        }
    }

    /// Number of distinct segments currently tracked.
    pub fn tracked(&self) -> usize {
        self.counts.len()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.order.clear();
    }
}

// * Collapses whitespace so reflowed copies of a block hash identically
fn normalize(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(min_len: u64, max_repetitions: u64) -> RepetitionFilter {
        RepetitionFilter::from_settings(&DedupSettings {
            min_duplcheck_size: min_len,
            max_repetitions,
        })
    }

    #[test]
    fn test_short_segments_never_flagged() {
        let mut f = filter(100, 2);
        for _ in 0..10 {
            assert!(!f.is_repeated("short boilerplate"));
        }
        assert_eq!(f.tracked(), 0);
    }

    #[test]
    fn test_flagged_after_budget_exhausted() {
        let mut f = filter(10, 2);
        let block = "a boilerplate navigation block repeated on every page";
        assert!(!f.is_repeated(block)); // 1st occurrence
        assert!(!f.is_repeated(block)); // 2nd
        assert!(f.is_repeated(block)); // 3rd exceeds MAX_REPETITIONS = 2
        assert!(f.is_repeated(block));
    }

    #[test]
    fn test_distinct_segments_tracked_separately() {
        let mut f = filter(5, 1);
        assert!(!f.is_repeated("first unique paragraph"));
        assert!(!f.is_repeated("second unique paragraph"));
        assert_eq!(f.tracked(), 2);
    }

    #[test]
    fn test_whitespace_variants_hash_identically() {
        let mut f = filter(10, 1);
        assert!(!f.is_repeated("subscribe to   our\nnewsletter"));
        assert!(f.is_repeated("subscribe to our newsletter"));
    }

    #[test]
    fn test_capacity_eviction() {
        let mut f = RepetitionFilter::with_capacity(
            &DedupSettings {
                min_duplcheck_size: 1,
                max_repetitions: 1,
            },
            2,
        );
        f.is_repeated("segment one");
        f.is_repeated("segment two");
        f.is_repeated("segment three"); // evicts "segment one"
        assert_eq!(f.tracked(), 2);
        // * Evicted segment counts from scratch again
        assert!(!f.is_repeated("segment one"));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut f = filter(1, 1);
        f.is_repeated("something");
        f.clear();
        assert_eq!(f.tracked(), 0);
        assert!(!f.is_repeated("something"));
    }
}
