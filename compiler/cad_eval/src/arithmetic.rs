//! Arithmetic operators.
//!
//! Integer arithmetic wraps like the native 64-bit operations. Division and
//! modulus by zero yield Error. Real arithmetic is computed first and then
//! checked: a NaN or infinite result becomes Error, and real modulus is
//! rejected before computing. No floating-point trap state is touched, so
//! the checks are reentrant.

use cad_ir::{coerce_to_number, AbsTime, OpKind, Value, ValueKind};

pub(crate) fn arithmetic(op: OpKind, v1: Value, v2: Value) -> Value {
    if op == OpKind::UnaryMinus {
        return negate(v1);
    }

    if !is_arithmetic_operand(&v1) || !is_arithmetic_operand(&v2) {
        return Value::Error;
    }

    let (mut v1, mut v2) = (v1, v2);
    match coerce_to_number(&mut v1, &mut v2) {
        ValueKind::Integer => match (&v1, &v2) {
            (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b),
            _ => unreachable!("integer coercion produced non-integers"),
        },
        ValueKind::Real => match (&v1, &v2) {
            (Value::Real(a), Value::Real(b)) => real_arithmetic(op, *a, *b),
            _ => unreachable!("real coercion produced non-reals"),
        },
        ValueKind::AbsoluteTime | ValueKind::RelativeTime => time_arithmetic(op, &v1, &v2),
        ValueKind::Undefined => Value::Undefined,
        _ => Value::Error,
    }
}

fn is_arithmetic_operand(v: &Value) -> bool {
    matches!(
        v,
        Value::Integer(_)
            | Value::Real(_)
            | Value::Boolean(_)
            | Value::AbsoluteTime(_)
            | Value::RelativeTime(_)
            | Value::Undefined
            | Value::Error
    )
}

fn negate(v: Value) -> Value {
    match v {
        Value::Integer(i) => Value::Integer(i.wrapping_neg()),
        Value::Real(r) => Value::Real(-r),
        Value::RelativeTime(secs) => Value::RelativeTime(-secs),
        Value::Undefined | Value::Error => v,
        _ => Value::Error,
    }
}

fn integer_arithmetic(op: OpKind, a: i64, b: i64) -> Value {
    match op {
        OpKind::Addition => Value::Integer(a.wrapping_add(b)),
        OpKind::Subtraction => Value::Integer(a.wrapping_sub(b)),
        OpKind::Multiplication => Value::Integer(a.wrapping_mul(b)),
        OpKind::Division if b == 0 => Value::Error,
        OpKind::Division => Value::Integer(a.wrapping_div(b)),
        OpKind::Modulus if b == 0 => Value::Error,
        OpKind::Modulus => Value::Integer(a.wrapping_rem(b)),
        _ => unreachable!("{op:?} is not a binary arithmetic operator"),
    }
}

fn real_arithmetic(op: OpKind, a: f64, b: f64) -> Value {
    let result = match op {
        OpKind::Addition => a + b,
        OpKind::Subtraction => a - b,
        OpKind::Multiplication => a * b,
        OpKind::Division => a / b,
        OpKind::Modulus => return Value::Error,
        _ => unreachable!("{op:?} is not a binary arithmetic operator"),
    };
    checked_real(result)
}

#[inline]
fn checked_real(result: f64) -> Value {
    if result.is_finite() {
        Value::Real(result)
    } else {
        Value::Error
    }
}

#[inline]
fn checked_duration(result: f64) -> Value {
    if result.is_finite() {
        Value::RelativeTime(result)
    } else {
        Value::Error
    }
}

/// Arithmetic involving at least one absolute or relative time.
///
/// Relative times added to absolute times are truncated to whole seconds.
fn time_arithmetic(op: OpKind, v1: &Value, v2: &Value) -> Value {
    match (op, v1, v2) {
        (OpKind::Addition, Value::AbsoluteTime(t), Value::RelativeTime(d))
        | (OpKind::Addition, Value::RelativeTime(d), Value::AbsoluteTime(t)) => {
            shift_time(*t, *d as i64)
        }
        (OpKind::Subtraction, Value::AbsoluteTime(t), Value::RelativeTime(d)) => {
            shift_time(*t, (*d as i64).wrapping_neg())
        }
        (OpKind::Subtraction, Value::AbsoluteTime(a), Value::AbsoluteTime(b)) => {
            Value::RelativeTime(a.secs.wrapping_sub(b.secs) as f64)
        }
        (OpKind::Addition, Value::RelativeTime(a), Value::RelativeTime(b)) => {
            checked_duration(a + b)
        }
        (OpKind::Subtraction, Value::RelativeTime(a), Value::RelativeTime(b)) => {
            checked_duration(a - b)
        }
        (OpKind::Multiplication, Value::RelativeTime(d), Value::Integer(n))
        | (OpKind::Multiplication, Value::Integer(n), Value::RelativeTime(d)) => {
            checked_duration(d * *n as f64)
        }
        (OpKind::Multiplication, Value::RelativeTime(d), Value::Real(r))
        | (OpKind::Multiplication, Value::Real(r), Value::RelativeTime(d)) => {
            checked_duration(d * r)
        }
        (OpKind::Division, Value::RelativeTime(d), Value::Integer(n)) => {
            checked_duration(d / *n as f64)
        }
        (OpKind::Division, Value::RelativeTime(d), Value::Real(r)) => checked_duration(d / r),
        _ => Value::Error,
    }
}

fn shift_time(t: AbsTime, secs: i64) -> Value {
    Value::AbsoluteTime(AbsTime {
        secs: t.secs.wrapping_add(secs),
        offset: t.offset,
    })
}
