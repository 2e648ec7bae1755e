//! Numeric coercion shared by comparison and arithmetic.

use super::{Value, ValueKind};

/// Bring two operands to a common numeric kind.
///
/// Returns the kind both operands now share, or a marker kind when they
/// cannot be treated as numbers:
/// - `ClassAd`, `List` or `Null` on either side: that kind
/// - `String` on either side: `String` (mismatch marker)
/// - `Undefined` on either side: `Undefined`
/// - `Error` on either side: `Error`
/// - an absolute or relative time on either side: that time kind
///
/// Otherwise booleans are rewritten to Integer 1/0, and when one operand is
/// Integer and the other Real, the Integer operand alone is rewritten to Real.
/// The Real operand is never touched.
pub fn coerce_to_number(v1: &mut Value, v2: &mut Value) -> ValueKind {
    for marker in [ValueKind::ClassAd, ValueKind::List, ValueKind::Null] {
        if v1.kind() == marker || v2.kind() == marker {
            return marker;
        }
    }
    if v1.is_string() || v2.is_string() {
        return ValueKind::String;
    }
    if v1.is_undefined() || v2.is_undefined() {
        return ValueKind::Undefined;
    }
    if v1.is_error() || v2.is_error() {
        return ValueKind::Error;
    }
    if matches!(v1, Value::AbsoluteTime(_)) || matches!(v2, Value::AbsoluteTime(_)) {
        return ValueKind::AbsoluteTime;
    }
    if matches!(v1, Value::RelativeTime(_)) || matches!(v2, Value::RelativeTime(_)) {
        return ValueKind::RelativeTime;
    }

    promote_boolean(v1);
    promote_boolean(v2);

    match (v1.as_integer(), v2.as_integer()) {
        (Some(_), Some(_)) => ValueKind::Integer,
        (Some(i), None) => {
            *v1 = Value::Real(i as f64);
            ValueKind::Real
        }
        (None, Some(i)) => {
            *v2 = Value::Real(i as f64);
            ValueKind::Real
        }
        (None, None) => ValueKind::Real,
    }
}

fn promote_boolean(v: &mut Value) {
    if let Value::Boolean(b) = *v {
        *v = Value::Integer(i64::from(b));
    }
}
