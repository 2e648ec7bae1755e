//! `ClassAd` Eval - the operator evaluation engine.
//!
//! Every operator of the expression language is a pure function from one to
//! three operand values to a result value. Error and Undefined are results,
//! never failures: nothing in this crate returns `Result`.
//!
//! # Architecture
//!
//! - `operate`: the dispatcher (no-op/unary plus, strictness pre-check,
//!   range dispatch)
//! - `comparison`, `arithmetic`, `logical`, `bitwise`, `conditional`: one
//!   handler per operator family
//! - `try_short_circuit`: the left-operand pre-check callers of `||`/`&&`
//!   must run before evaluating the right operand
//!
//! The engine holds no state and performs no I/O, so it is reentrant and may
//! run on any number of threads.

mod arithmetic;
mod bitwise;
mod comparison;
mod conditional;
mod logical;
mod operators;

#[cfg(test)]
mod tests;

pub use logical::try_short_circuit;
pub use operators::{evaluate_binary, evaluate_ternary, evaluate_unary, operate};
