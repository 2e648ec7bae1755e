//! `ClassAd` expressions.
//!
//! This crate ties the pieces together:
//!
//! - values and operators from `cad_ir`, evaluated by `cad_eval`
//! - expression trees, environments and the expression-interning cache from
//!   `cad_expr`
//! - the grammar from `cad_parse`
//!
//! It also owns the process-wide state: the shared [`ExprCache`], the
//! caching switch and the tracing subscriber.
//!
//! ```text
//! let assignment = classad::parse_assignment("Owner = \"alice\"")?;
//! let owner = assignment.expr.evaluate(&());
//! ```

mod config;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

pub use cad_eval::{evaluate_binary, evaluate_ternary, evaluate_unary, operate, try_short_circuit};
pub use cad_expr::{
    evaluate_constraint, CacheCounters, CachedEnvelope, Environment, ExprCache, ExprParser,
    ExprTree, Flattened, ParseFailure, Scope, MAX_EVAL_DEPTH,
};
pub use cad_ir::{AbsTime, OpCategory, OpKind, Record, Value, ValueKind};
pub use cad_parse::{parse_expression, Assignment, ClassAdParser, ParseError};
pub use config::{Config, ConfigError, EXPR_CACHING_VAR};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=cad_expr=trace` to follow cache hits and misses.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

static EXPR_CACHE: OnceLock<ExprCache> = OnceLock::new();
static EXPR_CACHING: OnceLock<AtomicBool> = OnceLock::new();

/// The process-wide expression cache, created on first use.
pub fn expr_cache() -> &'static ExprCache {
    EXPR_CACHE.get_or_init(|| {
        tracing::debug!("creating expression cache");
        ExprCache::new(ClassAdParser)
    })
}

/// Shut the process-wide cache down.
///
/// Trees already handed out stay valid. Later assignments still work but are
/// no longer shared. Does nothing if the cache was never created.
pub fn shutdown_expr_cache() {
    if let Some(cache) = EXPR_CACHE.get() {
        cache.shutdown();
    }
}

fn caching_switch() -> &'static AtomicBool {
    EXPR_CACHING.get_or_init(|| AtomicBool::new(Config::from_env().expr_caching))
}

/// Whether [`parse_assignment`] interns through [`expr_cache`].
///
/// Defaults to the `CLASSAD_EXPR_CACHING` setting.
pub fn expr_caching_enabled() -> bool {
    caching_switch().load(Ordering::Relaxed)
}

pub fn set_expr_caching(enabled: bool) {
    caching_switch().store(enabled, Ordering::Relaxed);
}

/// Parse a `Name = expression` line.
///
/// With caching enabled the right-hand side is shared through the
/// process-wide cache; otherwise every call builds its own tree.
pub fn parse_assignment(line: &str) -> Result<Assignment, ParseError> {
    let result = if expr_caching_enabled() {
        cad_parse::parse_assignment(expr_cache(), line)
    } else {
        cad_parse::parse_assignment_uncached(line)
    };
    if let Err(err) = &result {
        tracing::warn!(line, %err, "cannot parse assignment");
    }
    result
}
