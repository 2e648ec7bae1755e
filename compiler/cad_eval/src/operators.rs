//! Operator dispatch.
//!
//! Dispatch is by operator family (`OpKind::category`), which is derived
//! from discriminant ranges. The family handlers only ever see operators of
//! their own range; anything else reaching them is a logic fault.

use cad_ir::{OpCategory, OpKind, Value};

use crate::{arithmetic, bitwise, comparison, conditional, logical};

/// Apply `op` to up to three operands.
///
/// Operands beyond `op.arity()` are ignored. The order of evaluation is:
/// 1. no-op and parentheses return `v1` verbatim
/// 2. unary plus passes numbers (and exceptional values) through
/// 3. strict operators yield Error if any consumed operand is Error, else
///    Undefined if any is Undefined
/// 4. the family handler selected by operator range
pub fn operate(op: OpKind, v1: Value, v2: Value, v3: Value) -> Value {
    match op {
        OpKind::NoOp | OpKind::Parentheses => return v1,
        OpKind::UnaryPlus => return unary_plus(v1),
        _ => {}
    }

    if op.is_strict() {
        let operands = [&v1, &v2, &v3];
        let consumed = &operands[..op.arity()];
        if consumed.iter().any(|v| v.is_error()) {
            return Value::Error;
        }
        if consumed.iter().any(|v| v.is_undefined()) {
            return Value::Undefined;
        }
    }

    match op.category() {
        OpCategory::Comparison => comparison::compare(op, v1, v2),
        OpCategory::Arithmetic => arithmetic::arithmetic(op, v1, v2),
        OpCategory::Logical => logical::logical(op, v1, v2),
        OpCategory::Bitwise => bitwise::bitwise(op, v1, v2),
        OpCategory::Misc => conditional::misc(op, v1, v2, v3),
    }
}

/// Evaluate a unary operator (`+`, `-`, `!`, `~`, parentheses).
#[inline]
pub fn evaluate_unary(op: OpKind, operand: Value) -> Value {
    operate(op, operand, Value::Undefined, Value::Undefined)
}

/// Evaluate a binary operator.
#[inline]
pub fn evaluate_binary(op: OpKind, left: Value, right: Value) -> Value {
    operate(op, left, right, Value::Undefined)
}

/// Evaluate the ternary operator `a ? b : c`.
#[inline]
pub fn evaluate_ternary(op: OpKind, selector: Value, then: Value, otherwise: Value) -> Value {
    operate(op, selector, then, otherwise)
}

fn unary_plus(v: Value) -> Value {
    match v {
        Value::Integer(_)
        | Value::Real(_)
        | Value::RelativeTime(_)
        | Value::Undefined
        | Value::Error => v,
        _ => Value::Error,
    }
}
