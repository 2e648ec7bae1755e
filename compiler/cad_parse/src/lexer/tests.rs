use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<Token> {
    match tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|t| t.token).collect(),
        Err(err) => panic!("`{source}` failed to lex: {err}"),
    }
}

#[test]
fn test_longest_operator_wins() {
    assert_eq!(
        kinds("=?= =!= == = >>> >> >= > <= << <"),
        vec![
            Token::MetaEq,
            Token::MetaNotEq,
            Token::EqEq,
            Token::Assign,
            Token::UShr,
            Token::Shr,
            Token::GtEq,
            Token::Gt,
            Token::LtEq,
            Token::Shl,
            Token::Lt,
        ]
    );
    assert_eq!(kinds("?: ? :"), vec![Token::Elvis, Token::Question, Token::Colon]);
    assert_eq!(
        kinds("|| | && & ! !="),
        vec![
            Token::PipePipe,
            Token::Pipe,
            Token::AmpAmp,
            Token::Amp,
            Token::Bang,
            Token::NotEq,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("7 7. 7.25 .5 2e3 1.5E-2"),
        vec![
            Token::Int,
            Token::Real(7.0),
            Token::Real(7.25),
            Token::Real(0.5),
            Token::Real(2000.0),
            Token::Real(0.015),
        ]
    );
}

#[test]
fn test_digits_of_any_length_are_one_token() {
    assert_eq!(
        kinds("x + 99999999999999999999"),
        vec![Token::Ident, Token::Plus, Token::Int]
    );
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        kinds("Name my.Cpus _x TRUE is"),
        vec![Token::Ident; 5]
    );
}

#[test]
fn test_spans_skip_whitespace() {
    let tokens = tokenize("  a\t+\n\"b c\"").unwrap_or_default();
    let spans: Vec<_> = tokens.into_iter().map(|t| t.span).collect();
    assert_eq!(spans, vec![2..3, 4..5, 6..11]);
}

#[test]
fn test_string_token_keeps_escaped_quotes() {
    assert_eq!(kinds(r#""a \" b""#), vec![Token::String]);
    assert!(tokenize(r#""unterminated"#).is_err());
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r#"a\"b\\c\nd\te"#, 0), Ok("a\"b\\c\nd\te".to_owned()));
    assert_eq!(
        unescape(r"ab\x", 10),
        Err(ParseError::InvalidEscape {
            escape: 'x',
            offset: 12
        })
    );
}
