//! Run-time values of the `ClassAd` expression language.
//!
//! A `Value` holds exactly one datum kind at a time. Scalars and strings are
//! stored inline and copied by value; list and record payloads are shared
//! through [`Heap`], which can only be created via the factory methods here:
//!
//! ```text
//! let s = Value::string("hello");               // OK
//! let l = Value::list(vec![Value::Integer(1)]); // OK
//! let l = Value::List(Heap::new(vec![]));       // ERROR: Heap::new is pub(super)
//! ```
//!
//! `Error` and `Undefined` are ordinary values. Operators propagate them as
//! results rather than failing.

mod coerce;
mod heap;
mod record;

#[cfg(test)]
mod tests;

use std::fmt;

pub use coerce::coerce_to_number;
pub use heap::Heap;
pub use record::Record;

/// An absolute point in time: seconds since the Unix epoch plus the
/// timezone offset (in seconds east of UTC) it was expressed in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AbsTime {
    pub secs: i64,
    pub offset: i32,
}

/// The kind tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Error,
    Undefined,
    Boolean,
    Integer,
    Real,
    String,
    AbsoluteTime,
    RelativeTime,
    ClassAd,
    List,
    Null,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Error => "error",
            ValueKind::Undefined => "undefined",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::String => "string",
            ValueKind::AbsoluteTime => "absolute time",
            ValueKind::RelativeTime => "relative time",
            ValueKind::ClassAd => "classad",
            ValueKind::List => "list",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run-time value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Result of an invalid operation.
    Error,
    /// Value not known.
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    AbsoluteTime(AbsTime),
    /// Duration in seconds.
    RelativeTime(f64),
    /// Nested record.
    ClassAd(Heap<Record>),
    List(Heap<Vec<Value>>),
    Null,
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn class_ad(record: Record) -> Self {
        Value::ClassAd(Heap::new(record))
    }

    #[inline]
    pub fn abs_time(secs: i64, offset: i32) -> Self {
        Value::AbsoluteTime(AbsTime { secs, offset })
    }

    /// Integer 1 or 0; the comparison and logical families report truth this way.
    #[inline]
    pub fn truth(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

// Value Methods

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Error => ValueKind::Error,
            Value::Undefined => ValueKind::Undefined,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::String(_) => ValueKind::String,
            Value::AbsoluteTime(_) => ValueKind::AbsoluteTime,
            Value::RelativeTime(_) => ValueKind::RelativeTime,
            Value::ClassAd(_) => ValueKind::ClassAd,
            Value::List(_) => ValueKind::List,
            Value::Null => ValueKind::Null,
        }
    }

    /// Get the type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error)
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Error or Undefined.
    #[inline]
    pub fn is_exceptional(&self) -> bool {
        matches!(self, Value::Error | Value::Undefined)
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Integer or Real.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Truth value of booleans and numbers; `None` for every other kind.
    pub fn boolean_equivalent(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::Real(r) => Some(*r != 0.0),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::ClassAd(record) => Some(record),
            _ => None,
        }
    }
}

// Trait Implementations

/// Renders values in expression syntax, so literals round-trip through the
/// parser. Times have no literal syntax and render as `absTime`/`relTime`
/// calls, which evaluate back to the same value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Error => f.write_str("error"),
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r:?}"),
            Value::String(s) => write_quoted(f, s),
            Value::AbsoluteTime(t) => write!(f, "absTime({}, {})", t.secs, t.offset),
            Value::RelativeTime(secs) => write!(f, "relTime({secs:?})"),
            Value::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Value::ClassAd(record) => {
                f.write_str("[")?;
                for (i, (name, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name} = {value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Write `s` as a double-quoted string literal.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
