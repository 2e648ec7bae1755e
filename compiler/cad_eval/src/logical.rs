//! Logical operators and the `||`/`&&` short-circuit pre-check.
//!
//! Operands that are neither boolean-equivalent nor exceptional (strings,
//! lists, records, times, null) are treated as Error throughout this family.
//! Results are reported as Integer 1/0.

use cad_ir::{OpKind, Value};

/// Decide `||`/`&&` from the left operand alone.
///
/// Returns the final result when the right operand need not be evaluated:
/// - `||` with a truthy left operand: Integer 1
/// - `&&` with a falsy left operand: Integer 0
/// - `&&` with a String or Error left operand: Error
///
/// `||` does not short-circuit on Error or Undefined; its full table can
/// still turn `error || 1` into 1. Every other operator returns `None`.
pub fn try_short_circuit(op: OpKind, left: &Value) -> Option<Value> {
    match op {
        OpKind::LogicalOr => {
            (left.boolean_equivalent() == Some(true)).then(|| Value::truth(true))
        }
        OpKind::LogicalAnd => match left {
            Value::String(_) | Value::Error => Some(Value::Error),
            _ if left.boolean_equivalent() == Some(false) => Some(Value::truth(false)),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn logical(op: OpKind, v1: Value, v2: Value) -> Value {
    let v1 = recast(v1);
    let v2 = recast(v2);

    match op {
        OpKind::LogicalNot => match v1.boolean_equivalent() {
            Some(b) => Value::truth(!b),
            None => v1,
        },
        OpKind::LogicalOr => {
            if v1.boolean_equivalent() == Some(true) || v2.boolean_equivalent() == Some(true) {
                Value::truth(true)
            } else {
                exceptional_or(&v1, &v2).unwrap_or(Value::truth(false))
            }
        }
        OpKind::LogicalAnd => {
            if v1.boolean_equivalent() == Some(false) || v2.boolean_equivalent() == Some(false) {
                Value::truth(false)
            } else {
                exceptional_or(&v1, &v2).unwrap_or(Value::truth(true))
            }
        }
        _ => unreachable!("{op:?} is not a logical operator"),
    }
}

/// Error if either operand is Error, else Undefined if either is Undefined.
fn exceptional_or(v1: &Value, v2: &Value) -> Option<Value> {
    if v1.is_error() || v2.is_error() {
        Some(Value::Error)
    } else if v1.is_undefined() || v2.is_undefined() {
        Some(Value::Undefined)
    } else {
        None
    }
}

fn recast(v: Value) -> Value {
    if v.is_exceptional() || v.boolean_equivalent().is_some() {
        v
    } else {
        Value::Error
    }
}
