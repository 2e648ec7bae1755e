//! Tokenizer.
//!
//! Keywords (`true`, `false`, `undefined`, `error`, `is`, `isnt`) are
//! case-insensitive, so they are lexed as identifiers and recognised by the
//! parser.

use std::ops::Range;

use logos::Logos;

use crate::ParseError;

#[cfg(test)]
mod tests;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Assign,

    #[token("=?=")]
    MetaEq,
    #[token("=!=")]
    MetaNotEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<<")]
    Shl,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">>>")]
    UShr,
    #[token(">>")]
    Shr,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("||")]
    PipePipe,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("?:")]
    Elvis,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    /// Decimal digits; the parser converts them so that `-9223372036854775808`
    /// can be read.
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_real)]
    Real(f64),
    /// Double-quoted, escapes still in place.
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.]*")]
    Ident,
}

fn parse_real(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// A token and its byte range in the source.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => return Err(ParseError::InvalidToken { offset: span.start }),
        }
    }
    Ok(tokens)
}

/// Resolve the escapes of a string token's body (quotes stripped).
///
/// `offset` is the byte offset of the body, for error reporting.
pub(crate) fn unescape(body: &str, offset: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((_, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '"')) => out.push('"'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((at, escape)) => {
                return Err(ParseError::InvalidEscape {
                    escape,
                    offset: offset + at - 1,
                })
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "escape" }),
        }
    }
    Ok(out)
}
