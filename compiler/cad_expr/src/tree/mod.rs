//! Expression trees.
//!
//! `ExprTree` is the closed set of node kinds produced by the parser. Every
//! node evaluates to a `Value` against an [`Environment`]; evaluation never
//! fails in the Rust sense, faults come back as `Value::Error`.

mod unparse;


use cad_eval::{evaluate_ternary, operate, try_short_circuit};
use cad_ir::{OpKind, Record, Value};
use cad_stack::ensure_sufficient_stack;

use crate::cache::CachedEnvelope;
use crate::environment::{Environment, Layered};
use crate::functions;

/// How many attribute references one evaluation may resolve inside each
/// other.
///
/// Self-referential attributes (`A = A + 1`) and reference cycles end in
/// Error at this depth. Operator nesting is not limited.
pub const MAX_EVAL_DEPTH: usize = 256;

/// A node of a parsed expression.
///
/// Children are owned by their parent. The one exception is `Cached`, an
/// indirection to a shared entry of an [`ExprCache`](crate::ExprCache);
/// cloning a tree that contains one shares the entry.
#[derive(Clone, Debug)]
pub enum ExprTree {
    Literal(Value),
    /// A bare attribute name, resolved through the environment.
    AttributeReference(String),
    /// An operator applied to `op.arity()` operands.
    Operation {
        op: OpKind,
        args: Vec<ExprTree>,
    },
    FunctionCall {
        name: String,
        args: Vec<ExprTree>,
    },
    /// A nested record literal `[a = 1; b = a + 1]`.
    ClassAd(Vec<(String, ExprTree)>),
    /// A list literal `{1, 2, 3}`.
    ExprList(Vec<ExprTree>),
    Cached(CachedEnvelope),
}

impl ExprTree {
    #[inline]
    pub fn literal(value: Value) -> Self {
        ExprTree::Literal(value)
    }

    #[inline]
    pub fn attribute(name: impl Into<String>) -> Self {
        ExprTree::AttributeReference(name.into())
    }

    pub fn unary(op: OpKind, operand: ExprTree) -> Self {
        debug_assert_eq!(op.arity(), 1, "{op:?} is not unary");
        ExprTree::Operation {
            op,
            args: vec![operand],
        }
    }

    pub fn binary(op: OpKind, left: ExprTree, right: ExprTree) -> Self {
        debug_assert_eq!(op.arity(), 2, "{op:?} is not binary");
        ExprTree::Operation {
            op,
            args: vec![left, right],
        }
    }

    pub fn ternary(selector: ExprTree, then: ExprTree, otherwise: ExprTree) -> Self {
        ExprTree::Operation {
            op: OpKind::Ternary,
            args: vec![selector, then, otherwise],
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<ExprTree>) -> Self {
        ExprTree::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Evaluate against `env`.
    pub fn evaluate(&self, env: &dyn Environment) -> Value {
        self.eval_at(env, 0)
    }

    /// `depth` counts the attribute references being resolved, not tree
    /// levels; long operator chains recurse on a growing stack instead.
    pub(crate) fn eval_at(&self, env: &dyn Environment, depth: usize) -> Value {
        ensure_sufficient_stack(|| match self {
            ExprTree::Literal(value) => value.clone(),
            ExprTree::AttributeReference(name) => match env.lookup(name) {
                Some(_) if depth >= MAX_EVAL_DEPTH => {
                    tracing::debug!(attribute = %name, "attribute nesting exceeded");
                    Value::Error
                }
                Some(tree) => tree.eval_at(env, depth + 1),
                None => Value::Undefined,
            },
            ExprTree::Operation { op, args } => eval_operation(*op, args, env, depth),
            ExprTree::FunctionCall { name, args } => {
                functions::call(name, args, &|arg: &ExprTree| arg.eval_at(env, depth))
            }
            ExprTree::ClassAd(attrs) => {
                let scope = Layered::new(attrs, env);
                let record: Record = attrs
                    .iter()
                    .map(|(name, tree)| (name.as_str(), tree.eval_at(&scope, depth)))
                    .collect();
                Value::class_ad(record)
            }
            ExprTree::ExprList(items) => {
                Value::list(items.iter().map(|item| item.eval_at(env, depth)).collect())
            }
            ExprTree::Cached(envelope) => envelope.get().eval_at(env, depth),
        })
    }

    /// Structural equality.
    ///
    /// Attribute and function names compare case-insensitively; literals
    /// compare by kind and value. Two cached nodes sharing one entry are
    /// equal without parsing either.
    pub fn same_as(&self, other: &ExprTree) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (ExprTree::Cached(a), ExprTree::Cached(b)) if a.same_entry(b) => true,
            (ExprTree::Cached(a), _) => a.get().same_as(other),
            (_, ExprTree::Cached(b)) => self.same_as(b.get()),
            (ExprTree::Literal(a), ExprTree::Literal(b)) => a == b,
            (ExprTree::AttributeReference(a), ExprTree::AttributeReference(b)) => {
                a.eq_ignore_ascii_case(b)
            }
            (
                ExprTree::Operation { op: op_a, args: a },
                ExprTree::Operation { op: op_b, args: b },
            ) => op_a == op_b && all_same(a, b),
            (
                ExprTree::FunctionCall { name: name_a, args: a },
                ExprTree::FunctionCall { name: name_b, args: b },
            ) => name_a.eq_ignore_ascii_case(name_b) && all_same(a, b),
            (ExprTree::ClassAd(a), ExprTree::ClassAd(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((name_a, tree_a), (name_b, tree_b))| {
                        name_a.eq_ignore_ascii_case(name_b) && tree_a.same_as(tree_b)
                    })
            }
            (ExprTree::ExprList(a), ExprTree::ExprList(b)) => all_same(a, b),
            _ => false,
        })
    }

    fn take_children(&mut self) -> Vec<ExprTree> {
        match self {
            ExprTree::Operation { args, .. }
            | ExprTree::FunctionCall { args, .. }
            | ExprTree::ExprList(args) => std::mem::take(args),
            ExprTree::ClassAd(attrs) => std::mem::take(attrs)
                .into_iter()
                .map(|(_, tree)| tree)
                .collect(),
            ExprTree::Literal(_) | ExprTree::AttributeReference(_) | ExprTree::Cached(_) => {
                Vec::new()
            }
        }
    }

    /// The literal value, if this node is one.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            ExprTree::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Children are detached and dropped from a work list, so dropping a tree
/// does not recurse once per level.
impl Drop for ExprTree {
    fn drop(&mut self) {
        let mut pending = self.take_children();
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.take_children());
        }
    }
}

impl PartialEq for ExprTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl From<Value> for ExprTree {
    fn from(value: Value) -> Self {
        ExprTree::Literal(value)
    }
}

fn all_same(a: &[ExprTree], b: &[ExprTree]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
}

fn eval_operation(op: OpKind, args: &[ExprTree], env: &dyn Environment, depth: usize) -> Value {
    let eval = |i: usize| {
        args.get(i)
            .map_or(Value::Undefined, |arg| arg.eval_at(env, depth))
    };

    match op {
        OpKind::LogicalOr | OpKind::LogicalAnd => {
            let left = eval(0);
            if let Some(decided) = try_short_circuit(op, &left) {
                return decided;
            }
            operate(op, left, eval(1), Value::Undefined)
        }
        OpKind::Ternary => {
            let selector = eval(0);
            match selector.boolean_equivalent() {
                Some(true) => eval(1),
                Some(false) => eval(2),
                // the selector alone decides the result
                None => evaluate_ternary(op, selector, Value::Undefined, Value::Undefined),
            }
        }
        _ => {
            let v1 = eval(0);
            let v2 = if op.arity() >= 2 { eval(1) } else { Value::Undefined };
            operate(op, v1, v2, Value::Undefined)
        }
    }
}
