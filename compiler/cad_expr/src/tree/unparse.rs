//! Diagnostic unparser.
//!
//! Renders a tree back to expression syntax, adding parentheses only where
//! operator precedence would otherwise change the meaning. A cached node
//! renders its source text and is never parsed for it.

use std::fmt;

use cad_ir::OpKind;
use cad_stack::ensure_sufficient_stack;

use super::ExprTree;

/// Binding strength of a node when it appears as an operand.
fn binding(tree: &ExprTree) -> i8 {
    match tree {
        ExprTree::Operation { op, .. } if *op == OpKind::Parentheses => i8::MAX,
        ExprTree::Operation { op, .. } => op.precedence(),
        // source text of unknown shape
        ExprTree::Cached(_) => -1,
        _ => i8::MAX,
    }
}

fn operand(f: &mut fmt::Formatter<'_>, tree: &ExprTree, min: i8) -> fmt::Result {
    if binding(tree) < min {
        write!(f, "({tree})")
    } else {
        write!(f, "{tree}")
    }
}

fn separated(f: &mut fmt::Formatter<'_>, items: &[ExprTree], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn operation(f: &mut fmt::Formatter<'_>, op: OpKind, args: &[ExprTree]) -> fmt::Result {
    let [first, rest @ ..] = args else {
        return f.write_str("error");
    };
    let prec = op.precedence();

    match (op, rest) {
        (OpKind::NoOp, _) => write!(f, "{first}"),
        (OpKind::Parentheses, _) => write!(f, "({first})"),
        (OpKind::Subscript, [index, ..]) => {
            operand(f, first, prec)?;
            write!(f, "[{index}]")
        }
        (OpKind::Ternary, [then, otherwise, ..]) => {
            operand(f, first, prec + 1)?;
            write!(f, " ? {then} : ")?;
            operand(f, otherwise, prec)
        }
        (OpKind::Elvis, [otherwise, ..]) => {
            operand(f, first, prec + 1)?;
            f.write_str(" ?: ")?;
            operand(f, otherwise, prec)
        }
        _ if op.is_unary() => {
            f.write_str(op.symbol())?;
            operand(f, first, prec)
        }
        (_, [right, ..]) => {
            // left-associative: an equal-precedence right operand needs parens
            operand(f, first, prec)?;
            write!(f, " {} ", op.symbol())?;
            operand(f, right, prec + 1)
        }
        _ => f.write_str("error"),
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            ExprTree::Literal(value) => write!(f, "{value}"),
            ExprTree::AttributeReference(name) => f.write_str(name),
            ExprTree::Operation { op, args } => operation(f, *op, args),
            ExprTree::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                separated(f, args, ", ")?;
                f.write_str(")")
            }
            ExprTree::ClassAd(attrs) => {
                f.write_str("[")?;
                for (i, (name, tree)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{name} = {tree}")?;
                }
                f.write_str("]")
            }
            ExprTree::ExprList(items) => {
                f.write_str("{")?;
                separated(f, items, ", ")?;
                f.write_str("}")
            }
            ExprTree::Cached(envelope) => f.write_str(envelope.text()),
        })
    }
}
