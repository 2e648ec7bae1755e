//! `Name = expression` lines.
//!
//! The right-hand side is interned through an [`ExprCache`] keyed by the
//! attribute name and the trimmed source text. When a live entry already
//! exists for the pair the text is not parsed again.

use cad_expr::{ExprCache, ExprTree};
use logos::Logos;

use crate::lexer::{tokenize, unescape, Token};
use crate::parser::parse_tokens;
use crate::ParseError;


/// One parsed attribute definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub expr: ExprTree,
}

/// The name and the right-hand side of a line, before any parsing.
struct Split<'a> {
    name: &'a str,
    /// Byte offset of the right-hand side in the line.
    start: usize,
    text: &'a str,
}

fn split(line: &str) -> Result<Split<'_>, ParseError> {
    let mut lexer = Token::lexer(line);

    let name = match lexer.next() {
        Some(Ok(Token::Ident)) => lexer.slice(),
        Some(Ok(Token::String)) => {
            let span = lexer.span();
            let quoted = lexer.slice();
            let body = quoted.get(1..quoted.len().saturating_sub(1)).unwrap_or_default();
            return Err(ParseError::QuotedName {
                name: unescape(body, span.start + 1)?,
            });
        }
        _ => return Err(ParseError::NotAnAssignment),
    };
    if lexer.next() != Some(Ok(Token::Assign)) {
        return Err(ParseError::NotAnAssignment);
    }

    let rest = lexer.remainder();
    let text = rest.trim();
    if text.is_empty() {
        return Err(ParseError::UnexpectedEnd {
            expected: "expression",
        });
    }
    let start = line.len() - rest.trim_start().len();
    Ok(Split { name, start, text })
}

/// Parse the right-hand side of `split`, reporting offsets into `line`.
fn parse_rhs(line: &str, split: &Split<'_>) -> Result<ExprTree, ParseError> {
    let mut tokens = tokenize(line)?;
    tokens.retain(|t| t.span.start >= split.start);
    parse_tokens(line, &tokens)
}

/// Parse `line` and intern its right-hand side in `cache`.
///
/// A live cache entry for the same name and text is shared without
/// parsing. On a miss the text is parsed and the tree handed to the cache.
pub fn parse_assignment(cache: &ExprCache, line: &str) -> Result<Assignment, ParseError> {
    let split = split(line)?;

    if let Some(envelope) = cache.lookup(split.name, split.text) {
        tracing::trace!(name = split.name, "assignment shared from cache");
        return Ok(Assignment {
            name: split.name.to_owned(),
            expr: envelope.into_tree(),
        });
    }

    let tree = parse_rhs(line, &split)?;
    let envelope = cache.cache(split.name, split.text, Some(tree));
    Ok(Assignment {
        name: split.name.to_owned(),
        expr: envelope.into_tree(),
    })
}

/// Parse `line` into a plain tree that is not shared with anything.
pub fn parse_assignment_uncached(line: &str) -> Result<Assignment, ParseError> {
    let split = split(line)?;
    let expr = parse_rhs(line, &split)?;
    Ok(Assignment {
        name: split.name.to_owned(),
        expr,
    })
}
