//! Stack growth for recursive walks over expression trees.
//!
//! Parsing, evaluation, flattening, unparsing and dropping all recurse once
//! per tree level. A long `a + b + c + ...` chain is a left-leaning tree as
//! deep as it has terms, so every one of those walks wraps its recursive
//! step in [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended on the heap by `stacker` when
//! less than [`RED_ZONE`] bytes remain. On `wasm32` the closure just runs.

/// Grow when less than this much stack is left.
pub const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
pub const STACK_SEGMENT: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
