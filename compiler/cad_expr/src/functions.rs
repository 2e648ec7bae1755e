//! Builtin functions.
//!
//! Function names are case-insensitive. A call to an unknown function, or
//! with the wrong number of arguments, evaluates to Error. Arguments are
//! evaluated eagerly except for `ifThenElse`, which only evaluates the
//! branch it selects.
//!
//! `absTime` and `relTime` are how time values are written in expression
//! text, and both accept what their own output prints.

use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};

use cad_eval::evaluate_binary;
use cad_ir::{OpKind, Value};

use crate::ExprTree;


#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Builtin {
    IsUndefined,
    IsError,
    IsString,
    IsInteger,
    IsReal,
    IsBoolean,
    IsList,
    IsClassAd,
    Int,
    Real,
    String,
    Strcat,
    Substr,
    ToUpper,
    ToLower,
    Size,
    Member,
    IdenticalMember,
    Time,
    AbsTime,
    RelTime,
    IfThenElse,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        let builtin = match name.to_ascii_lowercase().as_str() {
            "isundefined" => Builtin::IsUndefined,
            "iserror" => Builtin::IsError,
            "isstring" => Builtin::IsString,
            "isinteger" => Builtin::IsInteger,
            "isreal" => Builtin::IsReal,
            "isboolean" => Builtin::IsBoolean,
            "islist" => Builtin::IsList,
            "isclassad" => Builtin::IsClassAd,
            "int" => Builtin::Int,
            "real" => Builtin::Real,
            "string" => Builtin::String,
            "strcat" => Builtin::Strcat,
            "substr" => Builtin::Substr,
            "toupper" => Builtin::ToUpper,
            "tolower" => Builtin::ToLower,
            "size" => Builtin::Size,
            "member" => Builtin::Member,
            "identicalmember" => Builtin::IdenticalMember,
            "time" => Builtin::Time,
            "abstime" => Builtin::AbsTime,
            "reltime" => Builtin::RelTime,
            "ifthenelse" => Builtin::IfThenElse,
            _ => return None,
        };
        Some(builtin)
    }

    /// Accepted argument counts.
    fn arity(self) -> RangeInclusive<usize> {
        match self {
            Builtin::Strcat => 0..=usize::MAX,
            Builtin::Time => 0..=0,
            Builtin::AbsTime => 0..=2,
            Builtin::Member | Builtin::IdenticalMember => 2..=2,
            Builtin::Substr => 2..=3,
            Builtin::IfThenElse => 3..=3,
            _ => 1..=1,
        }
    }
}

pub(crate) fn call(name: &str, args: &[ExprTree], eval: &dyn Fn(&ExprTree) -> Value) -> Value {
    let Some(builtin) = Builtin::from_name(name) else {
        tracing::debug!(function = name, "call to unknown function");
        return Value::Error;
    };
    if !builtin.arity().contains(&args.len()) {
        tracing::debug!(function = name, args = args.len(), "wrong number of arguments");
        return Value::Error;
    }

    if builtin == Builtin::IfThenElse {
        return if_then_else(args, eval);
    }

    let values: Vec<Value> = args.iter().map(eval).collect();
    match (builtin, values.as_slice()) {
        (Builtin::Strcat, _) => strcat(&values),
        (Builtin::Substr, [s, offset, rest @ ..]) => substr(s, offset, rest.first()),
        (Builtin::Member, [item, list]) => member(OpKind::Equal, item, list),
        (Builtin::IdenticalMember, [item, list]) => member(OpKind::MetaEqual, item, list),
        (Builtin::Time, _) => Value::Integer(now()),
        (Builtin::AbsTime, []) => Value::abs_time(now(), 0),
        (Builtin::AbsTime, [secs, rest @ ..]) => abs_time(secs, rest.first()),
        (_, [arg]) => unary(builtin, arg),
        _ => Value::Error,
    }
}

fn unary(builtin: Builtin, arg: &Value) -> Value {
    match builtin {
        Builtin::IsUndefined => Value::Boolean(arg.is_undefined()),
        Builtin::IsError => Value::Boolean(arg.is_error()),
        Builtin::IsString => Value::Boolean(matches!(arg, Value::String(_))),
        Builtin::IsInteger => Value::Boolean(matches!(arg, Value::Integer(_))),
        Builtin::IsReal => Value::Boolean(matches!(arg, Value::Real(_))),
        Builtin::IsBoolean => Value::Boolean(matches!(arg, Value::Boolean(_))),
        Builtin::IsList => Value::Boolean(matches!(arg, Value::List(_))),
        Builtin::IsClassAd => Value::Boolean(matches!(arg, Value::ClassAd(_))),
        Builtin::Int => to_integer(arg),
        Builtin::Real => to_real(arg),
        Builtin::String => to_string(arg.clone()),
        Builtin::ToUpper => map_string(arg.clone(), |s| s.to_ascii_uppercase()),
        Builtin::ToLower => map_string(arg.clone(), |s| s.to_ascii_lowercase()),
        Builtin::Size => size(arg),
        Builtin::RelTime => rel_time(arg),
        _ => Value::Error,
    }
}

fn if_then_else(args: &[ExprTree], eval: &dyn Fn(&ExprTree) -> Value) -> Value {
    let [condition, then, otherwise] = args else {
        return Value::Error;
    };
    let condition = eval(condition);
    match condition {
        Value::Undefined => Value::Undefined,
        _ => match condition.boolean_equivalent() {
            Some(true) => eval(then),
            Some(false) => eval(otherwise),
            None => Value::Error,
        },
    }
}

fn to_integer(v: &Value) -> Value {
    match v {
        Value::Integer(_) | Value::Undefined | Value::Error => v.clone(),
        Value::Boolean(b) => Value::Integer(i64::from(*b)),
        Value::Real(r) | Value::RelativeTime(r) => truncate(*r),
        Value::AbsoluteTime(t) => Value::Integer(t.secs),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => s.parse::<f64>().map_or(Value::Error, truncate),
            }
        }
        Value::List(_) | Value::ClassAd(_) | Value::Null => Value::Error,
    }
}

fn truncate(r: f64) -> Value {
    if r.is_finite() {
        Value::Integer(r.trunc() as i64)
    } else {
        Value::Error
    }
}

fn to_real(v: &Value) -> Value {
    match v {
        Value::Real(_) | Value::Undefined | Value::Error => v.clone(),
        Value::Boolean(b) => Value::Real(if *b { 1.0 } else { 0.0 }),
        Value::Integer(i) => Value::Real(*i as f64),
        Value::RelativeTime(r) => Value::Real(*r),
        Value::AbsoluteTime(t) => Value::Real(t.secs as f64),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(r) if r.is_finite() => Value::Real(r),
            _ => Value::Error,
        },
        Value::List(_) | Value::ClassAd(_) | Value::Null => Value::Error,
    }
}

fn to_string(v: Value) -> Value {
    match v {
        Value::String(_) | Value::Undefined | Value::Error => v,
        other => Value::String(other.to_string()),
    }
}

fn map_string(v: Value, f: impl FnOnce(&str) -> String) -> Value {
    match to_string(v) {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Concatenate the string forms of all arguments. Any Error argument makes
/// the result Error, otherwise any Undefined argument makes it Undefined.
fn strcat(values: &[Value]) -> Value {
    let mut out = String::new();
    for value in values {
        match value {
            Value::String(s) => out.push_str(s),
            Value::Error => return Value::Error,
            Value::Undefined => {
                return if values.iter().any(Value::is_error) {
                    Value::Error
                } else {
                    Value::Undefined
                };
            }
            other => out.push_str(&other.to_string()),
        }
    }
    Value::String(out)
}

fn size(v: &Value) -> Value {
    match v {
        Value::Undefined => Value::Undefined,
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::List(items) => Value::Integer(items.len() as i64),
        Value::ClassAd(record) => Value::Integer(record.len() as i64),
        _ => Value::Error,
    }
}

/// Perl-style substring over characters. A negative offset counts from
/// the end; a missing or non-positive length leaves that many characters
/// off the end, except that an explicit length of 0 selects nothing.
fn substr(s: &Value, offset: &Value, len: Option<&Value>) -> Value {
    if s.is_undefined() || offset.is_undefined() || len.is_some_and(Value::is_undefined) {
        return Value::Undefined;
    }
    let (Value::String(s), Value::Integer(offset)) = (s, offset) else {
        return Value::Error;
    };
    let len = match len {
        None => None,
        Some(Value::Integer(len)) => Some(*len),
        Some(_) => return Value::Error,
    };

    let total = s.chars().count() as i64;
    let start = if *offset < 0 {
        total.saturating_add(*offset).max(0)
    } else {
        (*offset).min(total)
    };
    let count = match len {
        Some(0) => 0,
        Some(len) if len > 0 => len.min(total - start),
        Some(len) => (total - start).saturating_add(len).max(0),
        None => total - start,
    };

    Value::String(s.chars().skip(start as usize).take(count as usize).collect())
}

/// Whether `item` equals some element of `list` under `op` (`==` or `=?=`).
fn member(op: OpKind, item: &Value, list: &Value) -> Value {
    let strict = op == OpKind::Equal;
    if list.is_undefined() || (strict && item.is_undefined()) {
        return Value::Undefined;
    }
    let Some(items) = list.as_list() else {
        return Value::Error;
    };
    if matches!(item, Value::List(_) | Value::ClassAd(_)) || (strict && item.is_error()) {
        return Value::Error;
    }

    let found = items.iter().any(|element| {
        evaluate_binary(op, element.clone(), item.clone()).boolean_equivalent() == Some(true)
    });
    Value::Boolean(found)
}

/// Seconds since the epoch, now.
fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}

/// `absTime(secs[, offset])`. Without an offset the time is taken as UTC.
fn abs_time(secs: &Value, offset: Option<&Value>) -> Value {
    let offset = match offset {
        None => 0,
        Some(Value::Integer(i)) => *i as i32,
        Some(Value::Real(r) | Value::RelativeTime(r)) => *r as i32,
        Some(_) => return Value::Error,
    };
    match secs {
        Value::Undefined => Value::Undefined,
        Value::Integer(i) => Value::abs_time(*i, offset),
        Value::Real(r) | Value::RelativeTime(r) => Value::abs_time(*r as i64, offset),
        Value::AbsoluteTime(_) => secs.clone(),
        _ => Value::Error,
    }
}

/// `relTime(secs)`.
fn rel_time(secs: &Value) -> Value {
    match secs {
        Value::Undefined | Value::RelativeTime(_) => secs.clone(),
        Value::Integer(i) => Value::RelativeTime(*i as f64),
        Value::Real(r) => Value::RelativeTime(*r),
        Value::AbsoluteTime(t) => Value::RelativeTime(t.secs as f64),
        _ => Value::Error,
    }
}
