//! Attribute environments for evaluation.

use rustc_hash::FxHashMap;

use crate::ExprTree;

/// Resolves attribute references during evaluation.
///
/// Lookup is by attribute name, which the expression language treats
/// case-insensitively.
pub trait Environment {
    fn lookup(&self, name: &str) -> Option<&ExprTree>;
}

/// The empty environment: every reference is undefined.
impl Environment for () {
    fn lookup(&self, _name: &str) -> Option<&ExprTree> {
        None
    }
}

/// A flat attribute table.
///
/// Names are stored lower-cased; the spelling used on insertion is not
/// kept.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    attrs: FxHashMap<String, ExprTree>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the previous binding.
    pub fn insert(&mut self, name: &str, tree: ExprTree) -> Option<ExprTree> {
        self.attrs.insert(name.to_ascii_lowercase(), tree)
    }

    pub fn remove(&mut self, name: &str) -> Option<ExprTree> {
        self.attrs.remove(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl Environment for Scope {
    fn lookup(&self, name: &str) -> Option<&ExprTree> {
        // avoid allocating when the caller already uses lower case
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.attrs.get(&name.to_ascii_lowercase())
        } else {
            self.attrs.get(name)
        }
    }
}

impl<S: AsRef<str>> FromIterator<(S, ExprTree)> for Scope {
    fn from_iter<I: IntoIterator<Item = (S, ExprTree)>>(iter: I) -> Self {
        let mut scope = Scope::new();
        for (name, tree) in iter {
            scope.insert(name.as_ref(), tree);
        }
        scope
    }
}

/// The attributes of a record literal, falling back to the enclosing
/// environment.
pub(crate) struct Layered<'a> {
    local: &'a [(String, ExprTree)],
    parent: &'a dyn Environment,
}

impl<'a> Layered<'a> {
    pub(crate) fn new(local: &'a [(String, ExprTree)], parent: &'a dyn Environment) -> Self {
        Self { local, parent }
    }
}

impl Environment for Layered<'_> {
    fn lookup(&self, name: &str) -> Option<&ExprTree> {
        self.local
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, tree)| tree)
            .or_else(|| self.parent.lookup(name))
    }
}
