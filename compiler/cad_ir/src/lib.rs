//! `ClassAd` IR - values and operator kinds.
//!
//! This crate contains the leaf data structures shared by the evaluator,
//! the expression trees and the interning cache:
//! - `Value`: the closed set of run-time datum kinds
//! - `coerce_to_number`: numeric promotion used by comparison and arithmetic
//! - `OpKind`: operator kinds laid out in contiguous category ranges
//!
//! # Design Philosophy
//!
//! - **Values, not exceptions**: `Error` and `Undefined` are ordinary values
//! - **Range dispatch**: operator families are identified by discriminant
//!   range, so adding an operator to a family is a one-line change

mod operators;
mod value;

pub use operators::{OpCategory, OpKind};
pub use value::{coerce_to_number, AbsTime, Heap, Record, Value, ValueKind};
