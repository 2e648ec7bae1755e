//! Cache counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A snapshot of the cache's lifetime counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Requests that found a live entry.
    pub hits: u64,
    /// Requests that created a new entry.
    pub misses: u64,
    /// All `cache` and `lookup` requests.
    pub queries: u64,
    /// Hits where the caller supplied a tree that was thrown away.
    pub hit_with_discard: u64,
    /// Index slots removed, by release or flush.
    pub removals: u64,
    /// Entries parsed on first use.
    pub lazy_parses: u64,
}

impl fmt::Display for CacheCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} queries={} hit_with_discard={} removals={} lazy_parses={}",
            self.hits, self.misses, self.queries, self.hit_with_discard, self.removals,
            self.lazy_parses
        )
    }
}

// Relaxed everywhere: the counters are diagnostics and order nothing.
#[derive(Default)]
pub(super) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    queries: AtomicU64,
    hit_with_discard: AtomicU64,
    removals: AtomicU64,
    lazy_parses: AtomicU64,
}

impl Counters {
    #[inline]
    pub(super) fn query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(super) fn hit(&self, discarded: bool) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        if discarded {
            self.hit_with_discard.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(super) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(super) fn removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(super) fn lazy_parse(&self) {
        self.lazy_parses.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self) -> CacheCounters {
        CacheCounters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            hit_with_discard: self.hit_with_discard.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            lazy_parses: self.lazy_parses.load(Ordering::Relaxed),
        }
    }
}
