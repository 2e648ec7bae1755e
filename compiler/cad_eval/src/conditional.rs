//! Ternary, Elvis and subscript operators.

use cad_ir::{OpKind, Value};

pub(crate) fn misc(op: OpKind, v1: Value, v2: Value, v3: Value) -> Value {
    match op {
        OpKind::Ternary => match selector(&v1) {
            Ok(true) => v2,
            Ok(false) => v3,
            Err(result) => result,
        },
        OpKind::Elvis => match selector(&v1) {
            Ok(true) => v1,
            Ok(false) => v2,
            Err(result) => result,
        },
        OpKind::Subscript => subscript(&v1, &v2),
        _ => unreachable!("{op:?} has no miscellaneous handler"),
    }
}

/// Truthiness of a selector, or the result when it has none.
///
/// Error selects Error; String and Undefined select Undefined; any other
/// kind without a truth value selects Error.
fn selector(v: &Value) -> Result<bool, Value> {
    match v {
        Value::Error => Err(Value::Error),
        Value::String(_) | Value::Undefined => Err(Value::Undefined),
        _ => v.boolean_equivalent().ok_or(Value::Error),
    }
}

fn subscript(container: &Value, index: &Value) -> Value {
    match (container, index) {
        (Value::List(items), Value::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Error),
        (Value::ClassAd(record), Value::String(name)) => {
            record.lookup(name).cloned().unwrap_or(Value::Error)
        }
        _ => Value::Error,
    }
}
