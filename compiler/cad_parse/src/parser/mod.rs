//! Recursive-descent parser with precedence climbing for binary operators.
//!
//! Binding strengths come from `OpKind::precedence`; every binary operator
//! is left-associative. The conditional operators sit below `||` and
//! associate to the right. Parentheses are kept as a `Parentheses` node so
//! the unparsed form matches the source.

use cad_expr::ExprTree;
use cad_ir::{OpKind, Value};
use cad_stack::ensure_sufficient_stack;

use crate::lexer::{tokenize, unescape, Spanned, Token};
use crate::ParseError;

#[cfg(test)]
mod tests;

/// Nesting limit for parenthesised, bracketed and unary sub-expressions.
const MAX_NESTING: usize = 256;

/// Parse a complete expression.
pub fn parse_expression(source: &str) -> Result<ExprTree, ParseError> {
    let tokens = tokenize(source)?;
    parse_tokens(source, &tokens)
}

/// Parse `tokens` as one complete expression. Spans index into `source`.
pub(crate) fn parse_tokens(source: &str, tokens: &[Spanned]) -> Result<ExprTree, ParseError> {
    let mut parser = Parser::new(source, tokens);
    let tree = parser.expression()?;
    parser.expect_end()?;
    Ok(tree)
}

struct Parser<'src, 't> {
    source: &'src str,
    tokens: &'t [Spanned],
    pos: usize,
    depth: usize,
}

impl<'src, 't> Parser<'src, 't> {
    fn new(source: &'src str, tokens: &'t [Spanned]) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // Token cursor

    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    fn advance(&mut self) -> Option<&'t Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek_token() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn slice(&self, spanned: &Spanned) -> &'src str {
        self.source.get(spanned.span.clone()).unwrap_or_default()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(spanned) => ParseError::Unexpected {
                expected,
                found: self.slice(spanned).to_owned(),
                offset: spanned.span.start,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of input")),
        }
    }

    fn offset(&self) -> usize {
        self.peek()
            .map_or(self.source.len(), |spanned| spanned.span.start)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::TooDeep {
                offset: self.offset(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Grammar

    /// `conditional := binary ( '?' expression ':' conditional | '?:' conditional )?`
    fn expression(&mut self) -> Result<ExprTree, ParseError> {
        ensure_sufficient_stack(|| {
            self.enter()?;
            let result = self.conditional();
            self.leave();
            result
        })
    }

    fn conditional(&mut self) -> Result<ExprTree, ParseError> {
        let selector = self.binary(OpKind::LogicalOr.precedence())?;

        if self.eat(Token::Question) {
            let then = self.expression()?;
            self.expect(Token::Colon, "`:`")?;
            let otherwise = self.expression()?;
            return Ok(ExprTree::ternary(selector, then, otherwise));
        }
        if self.eat(Token::Elvis) {
            let otherwise = self.expression()?;
            return Ok(ExprTree::binary(OpKind::Elvis, selector, otherwise));
        }
        Ok(selector)
    }

    fn binary(&mut self, min_prec: i8) -> Result<ExprTree, ParseError> {
        let mut left = self.unary()?;

        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.pos += 1;
            let right = self.binary(prec + 1)?;
            left = ExprTree::binary(op, left, right);
        }

        Ok(left)
    }

    fn binary_op(&self) -> Option<OpKind> {
        let spanned = self.peek()?;
        let op = match spanned.token {
            Token::PipePipe => OpKind::LogicalOr,
            Token::AmpAmp => OpKind::LogicalAnd,
            Token::Pipe => OpKind::BitwiseOr,
            Token::Caret => OpKind::BitwiseXor,
            Token::Amp => OpKind::BitwiseAnd,
            Token::EqEq => OpKind::Equal,
            Token::NotEq => OpKind::NotEqual,
            Token::MetaEq => OpKind::MetaEqual,
            Token::MetaNotEq => OpKind::MetaNotEqual,
            Token::Lt => OpKind::LessThan,
            Token::LtEq => OpKind::LessOrEqual,
            Token::Gt => OpKind::GreaterThan,
            Token::GtEq => OpKind::GreaterOrEqual,
            Token::Shl => OpKind::LeftShift,
            Token::Shr => OpKind::RightShift,
            Token::UShr => OpKind::UnsignedRightShift,
            Token::Plus => OpKind::Addition,
            Token::Minus => OpKind::Subtraction,
            Token::Star => OpKind::Multiplication,
            Token::Slash => OpKind::Division,
            Token::Percent => OpKind::Modulus,
            Token::Ident => {
                let word = self.slice(spanned);
                if word.eq_ignore_ascii_case("is") {
                    OpKind::MetaEqual
                } else if word.eq_ignore_ascii_case("isnt") {
                    OpKind::MetaNotEqual
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        Some(op)
    }

    fn unary(&mut self) -> Result<ExprTree, ParseError> {
        let op = match self.peek_token() {
            Some(Token::Minus) if self.at_negated_min() => {
                self.pos += 2;
                return Ok(ExprTree::literal(Value::Integer(i64::MIN)));
            }
            Some(Token::Minus) => OpKind::UnaryMinus,
            Some(Token::Plus) => OpKind::UnaryPlus,
            Some(Token::Bang) => OpKind::LogicalNot,
            Some(Token::Tilde) => OpKind::BitwiseNot,
            _ => return self.postfix(),
        };
        self.pos += 1;

        ensure_sufficient_stack(|| {
            self.enter()?;
            let operand = self.unary();
            self.leave();
            Ok(ExprTree::unary(op, operand?))
        })
    }

    /// `-` followed by the digits of `i64::MIN`'s magnitude, not subscripted.
    /// That magnitude alone does not fit an Integer.
    fn at_negated_min(&self) -> bool {
        let digits = match self.tokens.get(self.pos + 1) {
            Some(spanned) if spanned.token == Token::Int => self.slice(spanned),
            _ => return false,
        };
        let subscripted = self
            .tokens
            .get(self.pos + 2)
            .is_some_and(|t| t.token == Token::LBracket);
        !subscripted && digits.parse::<u64>() == Ok(i64::MIN.unsigned_abs())
    }

    fn integer(&self, spanned: &Spanned) -> Result<i64, ParseError> {
        self.slice(spanned)
            .parse()
            .map_err(|_| ParseError::IntegerOverflow {
                offset: spanned.span.start,
            })
    }

    /// `postfix := primary ( '[' expression ']' )*`
    fn postfix(&mut self) -> Result<ExprTree, ParseError> {
        let mut tree = self.primary()?;
        while self.eat(Token::LBracket) {
            let index = self.expression()?;
            self.expect(Token::RBracket, "`]`")?;
            tree = ExprTree::binary(OpKind::Subscript, tree, index);
        }
        Ok(tree)
    }

    fn primary(&mut self) -> Result<ExprTree, ParseError> {
        let Some(spanned) = self.advance() else {
            return Err(ParseError::UnexpectedEnd {
                expected: "expression",
            });
        };

        match spanned.token {
            Token::Int => Ok(ExprTree::literal(Value::Integer(self.integer(spanned)?))),
            Token::Real(r) => Ok(ExprTree::literal(Value::Real(r))),
            Token::String => {
                let quoted = self.slice(spanned);
                let body = quoted
                    .get(1..quoted.len().saturating_sub(1))
                    .unwrap_or_default();
                let text = unescape(body, spanned.span.start + 1)?;
                Ok(ExprTree::literal(Value::String(text)))
            }
            Token::Ident => self.word(spanned),
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(ExprTree::unary(OpKind::Parentheses, inner))
            }
            Token::LBrace => {
                let items = self.sequence(Token::RBrace, "`,` or `}`")?;
                Ok(ExprTree::ExprList(items))
            }
            Token::LBracket => self.record(),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("expression"))
            }
        }
    }

    /// Keyword literal, function call or attribute reference.
    fn word(&mut self, spanned: &Spanned) -> Result<ExprTree, ParseError> {
        let word = self.slice(spanned);
        let keyword = match word.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            "undefined" => Some(Value::Undefined),
            "error" => Some(Value::Error),
            _ => None,
        };
        if let Some(value) = keyword {
            return Ok(ExprTree::literal(value));
        }

        if self.eat(Token::LParen) {
            let args = self.sequence(Token::RParen, "`,` or `)`")?;
            return Ok(ExprTree::call(word, args));
        }
        Ok(ExprTree::attribute(word))
    }

    /// Comma-separated expressions up to `close`, which is consumed.
    fn sequence(&mut self, close: Token, expected: &'static str) -> Result<Vec<ExprTree>, ParseError> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(Token::Comma, expected)?;
        }
    }

    /// `record := '[' ( name '=' expression ( ';' name '=' expression )* ';'? )? ']'`
    fn record(&mut self) -> Result<ExprTree, ParseError> {
        let mut attrs = Vec::new();
        loop {
            if self.eat(Token::RBracket) {
                return Ok(ExprTree::ClassAd(attrs));
            }
            let Some(name) = self.peek().filter(|t| t.token == Token::Ident) else {
                return Err(self.unexpected("attribute name"));
            };
            self.pos += 1;
            let name = self.slice(name).to_owned();
            self.expect(Token::Assign, "`=`")?;
            let value = self.expression()?;
            attrs.push((name, value));

            if !self.eat(Token::Semicolon) {
                self.expect(Token::RBracket, "`;` or `]`")?;
                return Ok(ExprTree::ClassAd(attrs));
            }
        }
    }
}
