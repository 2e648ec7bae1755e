//! Constraint evaluation.

use crate::{Environment, ExprTree};


/// Evaluate `constraint` as a yes/no question.
///
/// Only a boolean-equivalent result can satisfy a constraint. Error,
/// Undefined and results of any other kind count as false and are logged.
pub fn evaluate_constraint(constraint: &ExprTree, env: &dyn Environment) -> bool {
    let result = constraint.evaluate(env);
    if let Some(satisfied) = result.boolean_equivalent() {
        return satisfied;
    }
    if result.is_exceptional() {
        tracing::warn!(%constraint, %result, "cannot evaluate constraint");
    } else {
        tracing::warn!(
            %constraint,
            kind = result.type_name(),
            "constraint did not evaluate to boolean"
        );
    }
    false
}
