//! Bitwise operators (integers only).
//!
//! Shift counts are taken modulo 64, as the native 64-bit shift
//! instructions do. Both right shifts are spelled out bit by bit for
//! negative operands so the result never depends on how the host shifts
//! signed values.

use cad_ir::{OpKind, Value};

const SIGN_BIT: i64 = i64::MIN;

pub(crate) fn bitwise(op: OpKind, v1: Value, v2: Value) -> Value {
    if op == OpKind::BitwiseNot {
        return match v1 {
            Value::Integer(i) => Value::Integer(!i),
            Value::Error => Value::Error,
            _ => Value::Undefined,
        };
    }

    let (a, b) = match (&v1, &v2) {
        (Value::Integer(a), Value::Integer(b)) => (*a, *b),
        _ if v1.is_error() || v2.is_error() => return Value::Error,
        _ => return Value::Undefined,
    };

    match op {
        OpKind::BitwiseOr => Value::Integer(a | b),
        OpKind::BitwiseAnd => Value::Integer(a & b),
        OpKind::BitwiseXor => Value::Integer(a ^ b),
        OpKind::LeftShift => Value::Integer(a.wrapping_shl(shift_count(b))),
        OpKind::RightShift => Value::Integer(arithmetic_shift_right(a, shift_count(b))),
        OpKind::UnsignedRightShift => Value::Integer(logical_shift_right(a, shift_count(b))),
        _ => unreachable!("{op:?} is not a binary bitwise operator"),
    }
}

#[inline]
fn shift_count(b: i64) -> u32 {
    (b & 63) as u32
}

/// Zero-filling right shift.
fn logical_shift_right(value: i64, count: u32) -> i64 {
    if value >= 0 {
        return value >> count;
    }
    if count == 0 {
        return value;
    }
    // shift once, then clear the sign bit for sure
    let shifted = (value >> 1) & !SIGN_BIT;
    shifted >> (count - 1)
}

/// Sign-extending right shift.
fn arithmetic_shift_right(value: i64, count: u32) -> i64 {
    if value >= 0 {
        return value >> count;
    }
    let mut shifted = value;
    for _ in 0..count {
        shifted = (shifted >> 1) | SIGN_BIT;
    }
    shifted
}
