//! Expression-interning cache.
//!
//! Processes that hold many near-identical records see the same
//! `name = expression` pairs over and over. The cache keeps one entry per
//! distinct `(name, text)` pair for as long as any tree refers to it, so the
//! text is parsed at most once and the tree is stored once.
//!
//! # Structure
//!
//! The index maps lower-cased attribute name to source text to a weak
//! handle on the entry. It is split into shards by a hash of the name, each
//! behind its own mutex. Entries are owned by the envelopes that use them;
//! the index never keeps an entry alive.
//!
//! # Lifecycle
//!
//! When the last envelope of an entry is dropped, the entry removes its own
//! index slot, but only if the slot still points at it: a concurrent miss may
//! already have replaced an expired slot with a fresh entry. After
//! [`ExprCache::shutdown`] (or once the cache itself is dropped) releases and
//! flushes do nothing.
//!
//! No entry is ever dropped while a shard lock is held, since its `Drop`
//! takes that lock.

mod entry;
mod stats;


use std::hash::BuildHasher;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::{ExprParser, ExprTree};
use entry::CacheEntry;

pub use entry::CachedEnvelope;
pub use stats::CacheCounters;

/// Number of index shards. Power of two.
const NUM_SHARDS: usize = 16;

/// Source text to entry, for one attribute name.
type Slots = FxHashMap<String, Weak<CacheEntry>>;

/// Lower-cased attribute name to its slots.
type Shard = FxHashMap<String, Slots>;

pub(super) struct CacheInner {
    shards: [Mutex<Shard>; NUM_SHARDS],
    parser: Arc<dyn ExprParser>,
    torn_down: AtomicBool,
    counters: stats::Counters,
}

impl CacheInner {
    #[inline]
    fn shard(&self, key: &str) -> &Mutex<Shard> {
        let hash = FxBuildHasher::default().hash_one(key);
        &self.shards[(hash as usize) & (NUM_SHARDS - 1)]
    }

    #[inline]
    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Remove `entry`'s slot if it still refers to `entry`.
    fn release(&self, entry: &CacheEntry) {
        if self.is_torn_down() {
            return;
        }
        let mut shard = self.shard(&entry.key).lock();
        let Some(slots) = shard.get_mut(&entry.key) else {
            return;
        };
        let is_own_slot = slots
            .get(&entry.text)
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), entry));
        if !is_own_slot {
            return;
        }
        slots.remove(&entry.text);
        if slots.is_empty() {
            shard.remove(&entry.key);
        }
        self.counters.removal();
        tracing::trace!(name = %entry.name, text = %entry.text, "released cache entry");
    }
}

/// A shared expression-interning cache.
///
/// Cloning the handle shares the cache.
#[derive(Clone)]
pub struct ExprCache {
    inner: Arc<CacheInner>,
}

impl ExprCache {
    /// Create a cache that parses lazily with `parser`.
    pub fn new(parser: impl ExprParser + 'static) -> Self {
        Self::with_parser(Arc::new(parser))
    }

    pub fn with_parser(parser: Arc<dyn ExprParser>) -> Self {
        ExprCache {
            inner: Arc::new(CacheInner {
                shards: std::array::from_fn(|_| Mutex::new(Shard::default())),
                parser,
                torn_down: AtomicBool::new(false),
                counters: stats::Counters::default(),
            }),
        }
    }

    /// Intern `(name, text)`.
    ///
    /// On a hit the supplied tree is discarded and the existing entry is
    /// shared. On a miss a new entry is created, owning `tree` if given and
    /// otherwise parsing `text` on first use. An empty `text` with a tree
    /// is keyed by the tree's unparsed form.
    ///
    /// After shutdown the envelope is standalone: it works, but is not
    /// indexed and is never shared.
    pub fn cache(&self, name: &str, text: &str, tree: Option<ExprTree>) -> CachedEnvelope {
        let text = match (&tree, text) {
            (Some(tree), "") => tree.to_string(),
            _ => text.to_owned(),
        };

        if self.inner.is_torn_down() {
            return self.standalone(name, text, tree);
        }
        self.inner.counters.query();

        let key = name.to_ascii_lowercase();
        let (envelope, discarded) = {
            let mut shard = self.inner.shard(&key).lock();
            let slots = shard.entry(key.clone()).or_default();

            if let Some(entry) = slots.get(&text).and_then(Weak::upgrade) {
                self.inner.counters.hit(tree.is_some());
                (CachedEnvelope { entry }, tree)
            } else {
                let entry = Arc::new(CacheEntry {
                    name: name.to_owned(),
                    key,
                    text: text.clone(),
                    tree: seeded(tree),
                    parser: Arc::clone(&self.inner.parser),
                    owner: Arc::downgrade(&self.inner),
                });
                slots.insert(text, Arc::downgrade(&entry));
                self.inner.counters.miss();
                (CachedEnvelope { entry }, None)
            }
        };
        // a discarded tree may hold the last reference to another entry
        drop(discarded);

        tracing::trace!(
            name,
            text = envelope.text(),
            refs = envelope.ref_count(),
            "cached expression"
        );
        envelope
    }

    /// Find a live entry for `(name, text)` without creating one.
    pub fn lookup(&self, name: &str, text: &str) -> Option<CachedEnvelope> {
        if self.inner.is_torn_down() {
            return None;
        }
        self.inner.counters.query();

        let key = name.to_ascii_lowercase();
        let entry = {
            let shard = self.inner.shard(&key).lock();
            shard
                .get(&key)
                .and_then(|slots| slots.get(text))
                .and_then(Weak::upgrade)
        }?;
        self.inner.counters.hit(false);
        Some(CachedEnvelope { entry })
    }

    /// Drop the index slot for `(name, text)`.
    ///
    /// Live envelopes keep working; later requests for the pair create a
    /// new entry. Does nothing if the pair is absent or after shutdown.
    pub fn flush(&self, name: &str, text: &str) {
        if self.inner.is_torn_down() {
            return;
        }
        let key = name.to_ascii_lowercase();
        let mut shard = self.inner.shard(&key).lock();
        let Some(slots) = shard.get_mut(&key) else {
            return;
        };
        if slots.remove(text).is_some() {
            self.inner.counters.removal();
            tracing::debug!(name, text, "flushed cache entry");
        }
        if slots.is_empty() {
            shard.remove(&key);
        }
    }

    /// Tear the cache down.
    ///
    /// Clears the index. Envelopes stay usable, but their release and any
    /// later flush become no-ops, and new requests get standalone envelopes.
    /// Only the first call has an effect.
    pub fn shutdown(&self) {
        if self.inner.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut cleared = 0;
        for shard in &self.inner.shards {
            let mut shard = shard.lock();
            cleared += shard.values().map(FxHashMap::len).sum::<usize>();
            shard.clear();
        }
        tracing::debug!(cleared, "expression cache shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.is_torn_down()
    }

    /// Number of indexed slots, live or not yet released.
    pub fn len(&self) -> usize {
        self.inner
            .shards
            .iter()
            .map(|shard| shard.lock().values().map(FxHashMap::len).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheCounters {
        self.inner.counters.snapshot()
    }

    /// Index slots whose entry has been dropped but is still indexed.
    ///
    /// Outside a race with a release in progress this is always empty;
    /// each stale slot found is logged at error level.
    pub fn expired_entries(&self) -> Vec<(String, String)> {
        let mut expired = Vec::new();
        for shard in &self.inner.shards {
            let shard = shard.lock();
            for (key, slots) in shard.iter() {
                for (text, weak) in slots {
                    if weak.strong_count() == 0 {
                        tracing::error!(name = %key, %text, "expired entry still indexed");
                        expired.push((key.clone(), text.clone()));
                    }
                }
            }
        }
        expired
    }

    /// Write one line per live entry, `[<name> = <text>] - <refs>`, then the
    /// counters.
    pub fn dump_to(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        let mut live = Vec::new();
        for shard in &self.inner.shards {
            let shard = shard.lock();
            live.extend(shard.values().flat_map(Slots::values).filter_map(Weak::upgrade));
        }
        live.sort_by(|a, b| (&a.key, &a.text).cmp(&(&b.key, &b.text)));

        for entry in &live {
            // not counting the handle held for the dump
            let refs = Arc::strong_count(entry) - 1;
            writeln!(sink, "[{} = {}] - {}", entry.name, entry.text, refs)?;
        }
        writeln!(sink, "{}", self.stats())
    }

    fn standalone(&self, name: &str, text: String, tree: Option<ExprTree>) -> CachedEnvelope {
        CachedEnvelope {
            entry: Arc::new(CacheEntry {
                name: name.to_owned(),
                key: name.to_ascii_lowercase(),
                text,
                tree: seeded(tree),
                parser: Arc::clone(&self.inner.parser),
                owner: Weak::new(),
            }),
        }
    }
}

impl std::fmt::Debug for ExprCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExprCache")
            .field("len", &self.len())
            .field("shut_down", &self.is_shut_down())
            .field("counters", &self.stats())
            .finish()
    }
}

fn seeded(tree: Option<ExprTree>) -> OnceLock<ExprTree> {
    tree.map_or_else(OnceLock::new, OnceLock::from)
}
