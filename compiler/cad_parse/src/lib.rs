//! `ClassAd` Parse - lexer and parser for attribute expressions.
//!
//! Turns the legacy single-value syntax (`Memory * 2 >= 1024 && Owner is
//! "alice"`) into [`ExprTree`]s, and `Name = expression` lines into
//! [`Assignment`]s interned through an [`ExprCache`](cad_expr::ExprCache).
//!
//! [`ClassAdParser`] plugs the grammar into the cache's parsing seam.

mod assignment;
mod error;
mod lexer;
mod parser;

use cad_expr::{ExprParser, ExprTree, ParseFailure};

pub use assignment::{parse_assignment, parse_assignment_uncached, Assignment};
pub use error::ParseError;
pub use parser::parse_expression;

/// The expression grammar as an [`ExprParser`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassAdParser;

impl ExprParser for ClassAdParser {
    fn parse_expression(&self, text: &str) -> Result<ExprTree, ParseFailure> {
        parse_expression(text).map_err(|err| ParseFailure::new(text, err))
    }
}
