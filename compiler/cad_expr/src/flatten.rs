//! Partial evaluation.
//!
//! Flattening folds every subtree that does not depend on an unresolved
//! attribute into its value, leaving a smaller tree for the rest. Short
//! circuits and ternary selection apply as in full evaluation.

use cad_eval::{evaluate_ternary, operate, try_short_circuit};
use cad_ir::{OpKind, Record, Value};
use cad_stack::ensure_sufficient_stack;

use crate::environment::{Environment, Layered};
use crate::{ExprTree, MAX_EVAL_DEPTH};


/// The result of flattening: a value, or the residual tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Flattened {
    Value(Value),
    Tree(ExprTree),
}

impl Flattened {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Flattened::Value(value) => Some(value),
            Flattened::Tree(_) => None,
        }
    }

    /// The residual tree, with a folded value as a literal.
    pub fn into_tree(self) -> ExprTree {
        match self {
            Flattened::Value(value) => ExprTree::Literal(value),
            Flattened::Tree(tree) => tree,
        }
    }
}

impl ExprTree {
    /// Partially evaluate against `env`.
    pub fn flatten(&self, env: &dyn Environment) -> Flattened {
        flatten_at(self, env, 0)
    }
}

fn flatten_at(tree: &ExprTree, env: &dyn Environment, depth: usize) -> Flattened {
    ensure_sufficient_stack(|| flatten_node(tree, env, depth))
}

fn flatten_node(tree: &ExprTree, env: &dyn Environment, depth: usize) -> Flattened {
    match tree {
        ExprTree::Literal(value) => Flattened::Value(value.clone()),
        ExprTree::AttributeReference(name) => match env.lookup(name) {
            Some(_) if depth >= MAX_EVAL_DEPTH => Flattened::Value(Value::Error),
            Some(bound) => flatten_at(bound, env, depth + 1),
            None => Flattened::Tree(tree.clone()),
        },
        ExprTree::Operation { op, args } => flatten_operation(*op, args, env, depth),
        ExprTree::FunctionCall { name, args } => {
            let args = flatten_all(args, env, depth);
            let call = ExprTree::call(name.as_str(), into_trees(args.parts));
            if args.folded {
                Flattened::Value(call.eval_at(env, depth))
            } else {
                Flattened::Tree(call)
            }
        }
        ExprTree::ClassAd(attrs) => {
            let scope = Layered::new(attrs, env);
            let parts: Vec<(&str, Flattened)> = attrs
                .iter()
                .map(|(name, attr)| (name.as_str(), flatten_at(attr, &scope, depth)))
                .collect();
            if parts.iter().all(|(_, part)| part.as_value().is_some()) {
                let record: Record = parts
                    .into_iter()
                    .map(|(name, part)| (name, into_value(part)))
                    .collect();
                Flattened::Value(Value::class_ad(record))
            } else {
                Flattened::Tree(ExprTree::ClassAd(
                    parts
                        .into_iter()
                        .map(|(name, part)| (name.to_owned(), part.into_tree()))
                        .collect(),
                ))
            }
        }
        ExprTree::ExprList(items) => {
            let items = flatten_all(items, env, depth);
            if items.folded {
                Flattened::Value(Value::list(items.parts.into_iter().map(into_value).collect()))
            } else {
                Flattened::Tree(ExprTree::ExprList(into_trees(items.parts)))
            }
        }
        ExprTree::Cached(envelope) => flatten_at(envelope.get(), env, depth),
    }
}

fn flatten_operation(op: OpKind, args: &[ExprTree], env: &dyn Environment, depth: usize) -> Flattened {
    let part = |i: usize| {
        args.get(i).map_or(Flattened::Value(Value::Undefined), |arg| {
            flatten_at(arg, env, depth)
        })
    };

    let first = part(0);
    match (op, first.as_value()) {
        (OpKind::LogicalOr | OpKind::LogicalAnd, Some(left)) => {
            if let Some(decided) = try_short_circuit(op, left) {
                return Flattened::Value(decided);
            }
        }
        (OpKind::Ternary, Some(selector)) => {
            return match selector.boolean_equivalent() {
                Some(true) => part(1),
                Some(false) => part(2),
                None => Flattened::Value(evaluate_ternary(
                    op,
                    selector.clone(),
                    Value::Undefined,
                    Value::Undefined,
                )),
            };
        }
        _ => {}
    }

    let mut parts = vec![first];
    parts.extend((1..op.arity()).map(part));

    if parts.iter().all(|p| p.as_value().is_some()) {
        let mut values = parts.into_iter().map(into_value);
        let mut next = || values.next().unwrap_or(Value::Undefined);
        let (v1, v2, v3) = (next(), next(), next());
        Flattened::Value(operate(op, v1, v2, v3))
    } else {
        Flattened::Tree(ExprTree::Operation {
            op,
            args: into_trees(parts),
        })
    }
}

struct Parts {
    parts: Vec<Flattened>,
    /// Every part folded to a value.
    folded: bool,
}

fn flatten_all(trees: &[ExprTree], env: &dyn Environment, depth: usize) -> Parts {
    let parts: Vec<Flattened> = trees.iter().map(|t| flatten_at(t, env, depth)).collect();
    let folded = parts.iter().all(|p| p.as_value().is_some());
    Parts { parts, folded }
}

fn into_trees(parts: Vec<Flattened>) -> Vec<ExprTree> {
    parts.into_iter().map(Flattened::into_tree).collect()
}

/// Callers check that every part is a value first.
fn into_value(part: Flattened) -> Value {
    match part {
        Flattened::Value(value) => value,
        Flattened::Tree(_) => Value::Error,
    }
}
