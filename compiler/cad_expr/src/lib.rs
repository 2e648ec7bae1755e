//! `ClassAd` Expr - expression trees and the expression-interning cache.
//!
//! # Architecture
//!
//! - `ExprTree`: parsed expressions and their evaluation
//! - `Environment`/`Scope`: attribute resolution
//! - `ExprCache`: deduplicates `(attribute name, source text)` pairs into
//!   shared, lazily parsed entries referenced through `CachedEnvelope` nodes
//! - `ExprParser`: the seam through which the cache parses source text
//!
//! Evaluation is delegated to `cad_eval`; this crate only decides which
//! subtrees get evaluated and in which order.

mod cache;
mod constraint;
mod environment;
mod flatten;
mod functions;
mod parser;
mod tree;

pub use cache::{CacheCounters, CachedEnvelope, ExprCache};
pub use constraint::evaluate_constraint;
pub use environment::{Environment, Scope};
pub use flatten::Flattened;
pub use parser::{ExprParser, ParseFailure};
pub use tree::{ExprTree, MAX_EVAL_DEPTH};
