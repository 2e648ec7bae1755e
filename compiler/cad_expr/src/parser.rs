//! The parsing seam used by the cache.
//!
//! The cache only needs `text -> tree`; the concrete grammar lives in a
//! separate crate and is handed to [`ExprCache`](crate::ExprCache) at
//! construction.

use crate::ExprTree;

/// A source text could not be parsed into an expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse `{text}`: {reason}")]
pub struct ParseFailure {
    pub text: String,
    pub reason: String,
}

impl ParseFailure {
    pub fn new(text: impl Into<String>, reason: impl ToString) -> Self {
        ParseFailure {
            text: text.into(),
            reason: reason.to_string(),
        }
    }
}

/// Turns expression source text into a tree.
pub trait ExprParser: Send + Sync {
    fn parse_expression(&self, text: &str) -> Result<ExprTree, ParseFailure>;
}

impl<F> ExprParser for F
where
    F: Fn(&str) -> Result<ExprTree, ParseFailure> + Send + Sync,
{
    fn parse_expression(&self, text: &str) -> Result<ExprTree, ParseFailure> {
        self(text)
    }
}
