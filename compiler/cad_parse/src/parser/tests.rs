use cad_expr::ExprTree;
use cad_ir::{OpKind, Value};
use pretty_assertions::assert_eq;

use super::parse_expression;
use crate::ParseError;

fn int(i: i64) -> ExprTree {
    ExprTree::literal(Value::Integer(i))
}

fn attr(name: &str) -> ExprTree {
    ExprTree::attribute(name)
}

fn parse(source: &str) -> ExprTree {
    match parse_expression(source) {
        Ok(tree) => tree,
        Err(err) => panic!("`{source}` failed to parse: {err}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse_expression(source) {
        Ok(tree) => panic!("`{source}` parsed as `{tree}`"),
        Err(err) => err,
    }
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbers() {
        assert_eq!(parse("42"), int(42));
        assert_eq!(parse("2.5"), ExprTree::literal(Value::Real(2.5)));
        assert_eq!(parse(".5"), ExprTree::literal(Value::Real(0.5)));
        assert_eq!(parse("1e3"), ExprTree::literal(Value::Real(1000.0)));
    }

    #[test]
    fn test_integer_extremes() {
        assert_eq!(parse("9223372036854775807"), int(i64::MAX));
        assert_eq!(parse("-9223372036854775808"), int(i64::MIN));
        assert_eq!(
            parse("- 9223372036854775808").evaluate(&()),
            Value::Integer(i64::MIN)
        );
        assert_eq!(parse(&int(i64::MIN).to_string()), int(i64::MIN));
        assert_eq!(
            parse("-9223372036854775807").evaluate(&()),
            Value::Integer(-i64::MAX)
        );
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        assert_eq!(
            parse_err("9223372036854775808"),
            ParseError::IntegerOverflow { offset: 0 }
        );
        assert_eq!(
            parse_err("x + 99999999999999999999"),
            ParseError::IntegerOverflow { offset: 4 }
        );
        assert_eq!(
            parse_err("-(9223372036854775808)"),
            ParseError::IntegerOverflow { offset: 2 }
        );
        assert_eq!(
            parse_err("-9223372036854775808[0]"),
            ParseError::IntegerOverflow { offset: 1 }
        );
        assert_eq!(parse_err("1 + 18446744073709551616").offset(), Some(4));
    }

    #[test]
    fn test_strings_resolve_escapes() {
        assert_eq!(parse(r#""alice""#), ExprTree::literal(Value::string("alice")));
        assert_eq!(
            parse(r#""say \"hi\"\n""#),
            ExprTree::literal(Value::string("say \"hi\"\n"))
        );
        assert_eq!(parse(r#""""#), ExprTree::literal(Value::string("")));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(parse("TRUE"), ExprTree::literal(Value::Boolean(true)));
        assert_eq!(parse("False"), ExprTree::literal(Value::Boolean(false)));
        assert_eq!(parse("UNDEFINED"), ExprTree::literal(Value::Undefined));
        assert_eq!(parse("error"), ExprTree::literal(Value::Error));
    }

    #[test]
    fn test_list_and_record() {
        assert_eq!(
            parse("{1, 2, 3}"),
            ExprTree::ExprList(vec![int(1), int(2), int(3)])
        );
        assert_eq!(parse("{}"), ExprTree::ExprList(vec![]));
        assert_eq!(
            parse("[a = 1; b = a]"),
            ExprTree::ClassAd(vec![("a".into(), int(1)), ("b".into(), attr("a"))])
        );
        assert_eq!(parse("[a = 1;]"), parse("[a = 1]"));
        assert_eq!(parse("[]"), ExprTree::ClassAd(vec![]));
    }
}

mod operators {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse("1 + 2 * 3"),
            ExprTree::binary(
                OpKind::Addition,
                int(1),
                ExprTree::binary(OpKind::Multiplication, int(2), int(3))
            )
        );
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        assert_eq!(
            parse("8 - 4 - 2"),
            ExprTree::binary(
                OpKind::Subtraction,
                ExprTree::binary(OpKind::Subtraction, int(8), int(4)),
                int(2)
            )
        );
    }

    #[test]
    fn test_parentheses_are_kept() {
        assert_eq!(
            parse("(1 + 2) * 3"),
            ExprTree::binary(
                OpKind::Multiplication,
                ExprTree::unary(
                    OpKind::Parentheses,
                    ExprTree::binary(OpKind::Addition, int(1), int(2))
                ),
                int(3)
            )
        );
    }

    #[test]
    fn test_logical_precedence() {
        assert_eq!(
            parse("a || b && c"),
            ExprTree::binary(
                OpKind::LogicalOr,
                attr("a"),
                ExprTree::binary(OpKind::LogicalAnd, attr("b"), attr("c"))
            )
        );
    }

    #[test]
    fn test_is_and_isnt_are_meta_comparisons() {
        assert_eq!(
            parse("x is undefined"),
            ExprTree::binary(
                OpKind::MetaEqual,
                attr("x"),
                ExprTree::literal(Value::Undefined)
            )
        );
        assert_eq!(parse("x ISNT 1"), parse("x =!= 1"));
    }

    #[test]
    fn test_shift_tokens() {
        assert_eq!(
            parse("a >>> 1"),
            ExprTree::binary(OpKind::UnsignedRightShift, attr("a"), int(1))
        );
        assert_eq!(
            parse("a >> 1 << 2"),
            ExprTree::binary(
                OpKind::LeftShift,
                ExprTree::binary(OpKind::RightShift, attr("a"), int(1)),
                int(2)
            )
        );
    }

    #[test]
    fn test_unary_operators_nest() {
        assert_eq!(
            parse("!-x"),
            ExprTree::unary(OpKind::LogicalNot, ExprTree::unary(OpKind::UnaryMinus, attr("x")))
        );
        assert_eq!(
            parse("-2 * 3"),
            ExprTree::binary(
                OpKind::Multiplication,
                ExprTree::unary(OpKind::UnaryMinus, int(2)),
                int(3)
            )
        );
    }

    #[test]
    fn test_ternary_is_right_associative() {
        assert_eq!(
            parse("a ? 1 : b ? 2 : 3"),
            ExprTree::ternary(attr("a"), int(1), ExprTree::ternary(attr("b"), int(2), int(3)))
        );
    }

    #[test]
    fn test_ternary_binds_looser_than_or() {
        assert_eq!(
            parse("a || b ? 1 : 2"),
            ExprTree::ternary(
                ExprTree::binary(OpKind::LogicalOr, attr("a"), attr("b")),
                int(1),
                int(2)
            )
        );
    }

    #[test]
    fn test_elvis() {
        assert_eq!(
            parse("a ?: 7"),
            ExprTree::binary(OpKind::Elvis, attr("a"), int(7))
        );
    }

    #[test]
    fn test_subscript_chains() {
        assert_eq!(
            parse("m[0][1]"),
            ExprTree::binary(
                OpKind::Subscript,
                ExprTree::binary(OpKind::Subscript, attr("m"), int(0)),
                int(1)
            )
        );
    }
}

mod names {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_calls() {
        assert_eq!(
            parse(r#"strcat("a", Name)"#),
            ExprTree::call(
                "strcat",
                vec![ExprTree::literal(Value::string("a")), attr("Name")]
            )
        );
        assert_eq!(parse("size()"), ExprTree::call("size", vec![]));
    }

    #[test]
    fn test_dotted_attribute_names() {
        assert_eq!(parse("my.Cpus"), attr("my.Cpus"));
    }

    #[test]
    fn test_attribute_names_compare_case_insensitively() {
        assert_eq!(parse("Memory"), parse("MEMORY"));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_operator() {
        assert_eq!(
            parse_err("1 +"),
            ParseError::UnexpectedEnd {
                expected: "expression"
            }
        );
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse_err("1 2"),
            ParseError::Unexpected {
                expected: "end of input",
                found: "2".into(),
                offset: 2,
            }
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(parse_err("(1"), ParseError::UnexpectedEnd { expected: "`)`" });
        assert_eq!(
            parse_err("1)"),
            ParseError::Unexpected {
                expected: "end of input",
                found: ")".into(),
                offset: 1,
            }
        );
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(parse_err("1 @ 2"), ParseError::InvalidToken { offset: 2 });
    }

    #[test]
    fn test_bad_escape_reports_its_offset() {
        assert_eq!(
            parse_err(r#""a\qb""#),
            ParseError::InvalidEscape {
                escape: 'q',
                offset: 2
            }
        );
    }

    #[test]
    fn test_missing_colon() {
        assert_eq!(
            parse_err("a ? 1"),
            ParseError::UnexpectedEnd { expected: "`:`" }
        );
    }

    #[test]
    fn test_record_requires_assignments() {
        assert_eq!(
            parse_err("[a 1]"),
            ParseError::Unexpected {
                expected: "`=`",
                found: "1".into(),
                offset: 3,
            }
        );
        assert_eq!(
            parse_err(r#"["a" = 1]"#),
            ParseError::Unexpected {
                expected: "attribute name",
                found: "\"a\"".into(),
                offset: 1,
            }
        );
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));

        let source = format!("{}1", "-".repeat(1000));
        assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));
    }

    #[test]
    fn test_moderate_nesting_is_fine() {
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(parse_expression(&source).is_ok());
    }
}

mod unparse {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unparse_reproduces_canonical_source() {
        for source in [
            "1 + 2 * 3",
            "(1 + 2) * 3",
            "a ? b : c",
            "x ?: 7",
            "!(a && b)",
            "strcat(\"a\", b)",
            "{1, 2.5, \"s\"}",
            "[a = 1; b = a + 1]",
            "m[0]",
            "x =?= undefined",
        ] {
            assert_eq!(parse(source).to_string(), source);
        }
    }

    #[test]
    fn test_unparse_parses_back_to_the_same_tree() {
        for source in ["8 - (4 - 2)", "a || b ? -1 : ~2", "x is y", "f(g(1), {})"] {
            let tree = parse(source);
            assert_eq!(parse(&tree.to_string()), tree);
        }
    }
}

mod evaluation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parsed_trees_evaluate() {
        assert_eq!(parse("1 + 2 * 3").evaluate(&()), Value::Integer(7));
        assert_eq!(parse("\"abc\" + 1").evaluate(&()), Value::Error);
        assert_eq!(parse("undefined && false").evaluate(&()), Value::Integer(0));
        assert_eq!(parse("5 % 0").evaluate(&()), Value::Error);
        assert_eq!(parse("true ? 10 : 20").evaluate(&()), Value::Integer(10));
        assert_eq!(parse("\"x\" ? 10 : 20").evaluate(&()), Value::Undefined);
        assert_eq!(parse("{1, 2, 3}[1]").evaluate(&()), Value::Integer(2));
        assert_eq!(
            parse("[a = 2; b = a * 3][\"B\"]").evaluate(&()),
            Value::Integer(6)
        );
    }

    #[test]
    fn test_time_literals_read_back() {
        assert_eq!(
            parse("absTime(100, 3600)").evaluate(&()),
            Value::abs_time(100, 3600)
        );
        assert_eq!(parse("relTime(90.5)").evaluate(&()), Value::RelativeTime(90.5));

        for value in [
            Value::abs_time(1_700_000_000, -18_000),
            Value::abs_time(0, 0),
            Value::RelativeTime(90.5),
            Value::RelativeTime(-3.0),
        ] {
            let text = value.to_string();
            assert_eq!(parse(&text).evaluate(&()), value, "`{text}`");
        }
    }

    #[test]
    fn test_long_chains() {
        let sum = vec!["1"; 10_000].join(" + ");
        assert_eq!(parse(&sum).evaluate(&()), Value::Integer(10_000));

        let clauses: Vec<String> = (0..300).map(|i| format!("{i} < {}", i + 1)).collect();
        let conjunction = parse(&clauses.join(" && "));
        assert_eq!(conjunction.evaluate(&()), Value::Integer(1));
        assert_eq!(conjunction.to_string(), clauses.join(" && "));
    }

    #[test]
    fn test_very_long_chain_parses_prints_and_drops() {
        let source = vec!["1"; 200_000].join(" + ");
        let tree = parse(&source);
        assert_eq!(tree.to_string(), source);
        assert_eq!(tree.evaluate(&()), Value::Integer(200_000));
        drop(tree);
    }
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    fn leaf() -> impl Strategy<Value = ExprTree> {
        prop_oneof![
            (0..1000_i64).prop_map(int),
            "[a-z][a-z0-9_]{0,6}"
                .prop_filter("keyword", |name| {
                    !matches!(
                        name.as_str(),
                        "true" | "false" | "undefined" | "error" | "is" | "isnt"
                    )
                })
                .prop_map(|name| attr(&name)),
            "[a-z ]{0,8}".prop_map(|s| ExprTree::literal(Value::string(s))),
        ]
    }

    fn binary_op() -> impl Strategy<Value = OpKind> {
        prop_oneof![
            Just(OpKind::Addition),
            Just(OpKind::Subtraction),
            Just(OpKind::Multiplication),
            Just(OpKind::Division),
            Just(OpKind::LessThan),
            Just(OpKind::Equal),
            Just(OpKind::MetaEqual),
            Just(OpKind::LogicalAnd),
            Just(OpKind::LogicalOr),
            Just(OpKind::BitwiseXor),
            Just(OpKind::LeftShift),
        ]
    }

    fn tree() -> impl Strategy<Value = ExprTree> {
        leaf().prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                (binary_op(), inner.clone(), inner.clone())
                    .prop_map(|(op, l, r)| ExprTree::binary(op, l, r)),
                inner
                    .clone()
                    .prop_map(|t| ExprTree::unary(OpKind::LogicalNot, t)),
                (inner.clone(), inner.clone(), inner.clone())
                    .prop_map(|(s, t, e)| ExprTree::ternary(s, t, e)),
                prop::collection::vec(inner, 0..3).prop_map(ExprTree::ExprList),
            ]
        })
    }

    proptest! {
        #[test]
        fn unparsed_trees_evaluate_the_same_after_reparsing(tree in tree()) {
            let text = tree.to_string();
            let reparsed = parse_expression(&text);
            prop_assert!(reparsed.is_ok(), "`{}` did not parse", text);
            if let Ok(reparsed) = reparsed {
                prop_assert_eq!(reparsed.evaluate(&()), tree.evaluate(&()));
                prop_assert_eq!(reparsed.to_string(), text);
            }
        }

        #[test]
        fn arbitrary_input_never_panics(source in "\\PC{0,40}") {
            let _ = parse_expression(&source);
        }
    }
}
