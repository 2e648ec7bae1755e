//! End-to-end behavior: source text through the parser, the cache and the
//! evaluator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use classad::{
    evaluate_constraint, parse_expression, ClassAdParser, ExprCache, ExprParser, ExprTree,
    ParseFailure, Scope, Value,
};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> ExprTree {
    match parse_expression(source) {
        Ok(tree) => tree,
        Err(err) => panic!("`{source}` failed to parse: {err}"),
    }
}

fn eval(source: &str) -> Value {
    parse(source).evaluate(&())
}

#[test]
fn test_string_plus_integer_is_error() {
    assert_eq!(eval("\"abc\" + 1"), Value::Error);
}

#[test]
fn test_undefined_and_false_is_false() {
    assert_eq!(eval("undefined && false"), Value::Integer(0));
    assert_eq!(eval("undefined || true"), Value::Integer(1));
    assert_eq!(eval("undefined && true"), Value::Undefined);
}

#[test]
fn test_integer_modulus_by_zero_is_error() {
    assert_eq!(eval("5 % 0"), Value::Error);
    assert_eq!(eval("5 / 0"), Value::Error);
    assert_eq!(eval("-7 / 2"), Value::Integer(-3));
}

#[test]
fn test_ternary_selection() {
    assert_eq!(eval("1 ? 10 : 20"), Value::Integer(10));
    assert_eq!(eval("0 ? 10 : 20"), Value::Integer(20));
    assert_eq!(eval("\"x\" ? 10 : 20"), Value::Undefined);
}

#[test]
fn test_cached_string_parses_once() {
    let parses = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&parses);
    let cache = ExprCache::new(move |text: &str| -> Result<ExprTree, ParseFailure> {
        counter.fetch_add(1, Ordering::SeqCst);
        ClassAdParser.parse_expression(text)
    });

    let envelope = cache.cache("Name", "\"alice\"", None);
    let first = envelope.get().evaluate(&());
    let second = envelope.get().evaluate(&());

    assert_eq!(first, Value::string("alice"));
    assert_eq!(second, Value::string("alice"));
    assert_eq!(parses.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().lazy_parses, 1);
}

#[test]
fn test_meta_equality_distinguishes_kinds() {
    assert_eq!(eval("1 == 1.0"), Value::Integer(1));
    assert_eq!(eval("1 =?= 1.0"), Value::Integer(0));
    assert_eq!(eval("\"ABC\" == \"abc\""), Value::Integer(1));
    assert_eq!(eval("\"ABC\" =?= \"abc\""), Value::Integer(0));
    assert_eq!(eval("undefined is undefined"), Value::Integer(1));
}

#[test]
fn test_constraint_against_a_machine() {
    let machine: Scope = [
        ("Memory", parse("4096")),
        ("Arch", parse("\"X86_64\"")),
        ("Cpus", parse("Memory / 1024")),
    ]
    .into_iter()
    .collect();

    let fits = |source: &str| evaluate_constraint(&parse(source), &machine);
    assert!(fits("Memory >= 2048 && Arch == \"x86_64\""));
    assert!(fits("cpus == 4"));
    assert!(!fits("Disk > 0"));
    assert!(!fits("Arch"));
    assert!(!fits("Memory > 8192"));
}

#[test]
fn test_shared_subexpressions_evaluate_per_environment() {
    let cache = ExprCache::new(ClassAdParser);
    let rank = cache.cache("Rank", "Memory * 2", None).into_tree();

    let small: Scope = [("Memory", ExprTree::literal(Value::Integer(1)))]
        .into_iter()
        .collect();
    let large: Scope = [("Memory", ExprTree::literal(Value::Integer(64)))]
        .into_iter()
        .collect();

    assert_eq!(rank.evaluate(&small), Value::Integer(2));
    assert_eq!(rank.evaluate(&large), Value::Integer(128));
    assert_eq!(rank.evaluate(&()), Value::Undefined);
}
