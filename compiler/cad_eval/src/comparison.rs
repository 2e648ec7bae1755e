//! Comparison operators.
//!
//! `=?=` and `=!=` compare kind and value without coercion and never yield
//! Error or Undefined. The ordering operators coerce to a common numeric kind
//! first; strings compare case-insensitively except when reused by the meta
//! operators.

use std::cmp::Ordering;

use cad_ir::{coerce_to_number, OpKind, Value, ValueKind};

#[derive(Copy, Clone, PartialEq, Eq)]
enum StringCase {
    Sensitive,
    Insensitive,
}

pub(crate) fn compare(op: OpKind, mut v1: Value, mut v2: Value) -> Value {
    match op {
        OpKind::MetaEqual => Value::truth(meta_equal(v1, v2)),
        OpKind::MetaNotEqual => Value::truth(!meta_equal(v1, v2)),
        _ => ordered(op, &mut v1, &mut v2, StringCase::Insensitive),
    }
}

/// Same kind and same value. Exceptional values are identical to themselves,
/// and so is NaN.
fn meta_equal(mut v1: Value, mut v2: Value) -> bool {
    if v1.kind() != v2.kind() {
        return false;
    }
    match (&v1, &v2) {
        (Value::Error, Value::Error)
        | (Value::Undefined, Value::Undefined)
        | (Value::Null, Value::Null) => true,
        (Value::Real(a), Value::Real(b)) | (Value::RelativeTime(a), Value::RelativeTime(b)) => {
            a == b || (a.is_nan() && b.is_nan())
        }
        (Value::List(a), Value::List(b)) => a == b,
        (Value::ClassAd(a), Value::ClassAd(b)) => a == b,
        _ => {
            ordered(OpKind::Equal, &mut v1, &mut v2, StringCase::Sensitive) == Value::truth(true)
        }
    }
}

fn ordered(op: OpKind, v1: &mut Value, v2: &mut Value, case: StringCase) -> Value {
    match coerce_to_number(v1, v2) {
        ValueKind::String => match (v1.as_str(), v2.as_str()) {
            (Some(a), Some(b)) => Value::truth(holds(op, compare_strings(a, b, case))),
            // comparing a string with a non-string is an error
            _ => Value::Error,
        },
        ValueKind::Integer => match (&*v1, &*v2) {
            (Value::Integer(a), Value::Integer(b)) => Value::truth(holds(op, a.cmp(b))),
            _ => unreachable!("integer coercion produced non-integers"),
        },
        ValueKind::Real => match (&*v1, &*v2) {
            (Value::Real(a), Value::Real(b)) => Value::truth(compare_reals(op, *a, *b)),
            _ => unreachable!("real coercion produced non-reals"),
        },
        ValueKind::AbsoluteTime => match (&*v1, &*v2) {
            (Value::AbsoluteTime(a), Value::AbsoluteTime(b)) => {
                Value::truth(holds(op, a.secs.cmp(&b.secs)))
            }
            _ => Value::Error,
        },
        ValueKind::RelativeTime => match (&*v1, &*v2) {
            (Value::RelativeTime(a), Value::RelativeTime(b)) => {
                Value::truth(compare_reals(op, *a, *b))
            }
            _ => Value::Error,
        },
        ValueKind::Undefined => Value::Undefined,
        ValueKind::Error | ValueKind::ClassAd | ValueKind::List | ValueKind::Null => Value::Error,
        ValueKind::Boolean => unreachable!("coercion never yields booleans"),
    }
}

fn compare_strings(a: &str, b: &str, case: StringCase) -> Ordering {
    match case {
        StringCase::Sensitive => a.cmp(b),
        StringCase::Insensitive => a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase())),
    }
}

/// Native float comparison: every relation involving NaN is false except `!=`.
fn compare_reals(op: OpKind, a: f64, b: f64) -> bool {
    match a.partial_cmp(&b) {
        Some(ordering) => holds(op, ordering),
        None => op == OpKind::NotEqual,
    }
}

fn holds(op: OpKind, ordering: Ordering) -> bool {
    match op {
        OpKind::LessThan => ordering == Ordering::Less,
        OpKind::LessOrEqual => ordering != Ordering::Greater,
        OpKind::NotEqual => ordering != Ordering::Equal,
        OpKind::Equal => ordering == Ordering::Equal,
        OpKind::GreaterOrEqual => ordering != Ordering::Less,
        OpKind::GreaterThan => ordering == Ordering::Greater,
        _ => unreachable!("{op:?} is not an ordering comparison"),
    }
}
