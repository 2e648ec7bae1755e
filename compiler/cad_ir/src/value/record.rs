//! Evaluated attribute records, the payload of `Value::ClassAd`.

use super::Value;

/// An evaluated record: attribute name to value, in insertion order.
///
/// Attribute names are matched case-insensitively, but the spelling of the
/// first insertion is kept for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    attrs: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute. Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        if let Some(slot) = self
            .attrs
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.attrs.push((name, value));
        None
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.attrs
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
