//! Cache entries and the envelopes that share them.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use cad_ir::Value;

use super::CacheInner;
use crate::{ExprParser, ExprTree};

/// One interned `(name, text)` pair.
///
/// The source text is authoritative; the tree is derived from it on first
/// use unless the creator supplied one.
pub(super) struct CacheEntry {
    /// Attribute name as first cached.
    pub(super) name: String,
    /// Lower-cased name, the index key.
    pub(super) key: String,
    pub(super) text: String,
    pub(super) tree: OnceLock<ExprTree>,
    pub(super) parser: Arc<dyn ExprParser>,
    /// Dead for standalone entries and once the cache is dropped.
    pub(super) owner: Weak<CacheInner>,
}

impl CacheEntry {
    fn parse(&self) -> ExprTree {
        if let Some(owner) = self.owner.upgrade() {
            owner.counters.lazy_parse();
        }
        match self.parser.parse_expression(&self.text) {
            Ok(tree) => {
                tracing::trace!(name = %self.name, text = %self.text, "parsed cached expression");
                tree
            }
            Err(failure) => {
                tracing::warn!(name = %self.name, %failure, "cached expression does not parse");
                ExprTree::Literal(Value::Error)
            }
        }
    }
}

impl Drop for CacheEntry {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.release(self);
        }
    }
}

/// A tree node standing in for a cached expression.
///
/// Cloning shares the entry; the entry leaves the index when its last
/// envelope is dropped.
#[derive(Clone)]
pub struct CachedEnvelope {
    pub(super) entry: Arc<CacheEntry>,
}

impl CachedEnvelope {
    /// The attribute name the entry was created for.
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// The source text, available without parsing.
    pub fn text(&self) -> &str {
        &self.entry.text
    }

    /// The parsed tree, parsing the source text on first call.
    ///
    /// Text that does not parse yields an Error literal.
    pub fn get(&self) -> &ExprTree {
        self.entry.tree.get_or_init(|| self.entry.parse())
    }

    pub fn is_parsed(&self) -> bool {
        self.entry.tree.get().is_some()
    }

    /// Whether both envelopes share one entry.
    #[inline]
    pub fn same_entry(&self, other: &CachedEnvelope) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }

    /// Number of envelopes sharing the entry.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.entry)
    }

    /// Wrap into a tree node.
    pub fn into_tree(self) -> ExprTree {
        ExprTree::Cached(self)
    }
}

impl fmt::Debug for CachedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedEnvelope")
            .field("name", &self.entry.name)
            .field("text", &self.entry.text)
            .field("parsed", &self.is_parsed())
            .finish()
    }
}
