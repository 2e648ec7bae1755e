use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_is_undefined() {
    assert_eq!(Value::default(), Value::Undefined);
}

#[test]
fn test_kinds() {
    assert_eq!(Value::Error.kind(), ValueKind::Error);
    assert_eq!(Value::Integer(3).kind(), ValueKind::Integer);
    assert_eq!(Value::string("x").kind(), ValueKind::String);
    assert_eq!(Value::list(vec![]).kind(), ValueKind::List);
    assert_eq!(Value::class_ad(Record::new()).kind(), ValueKind::ClassAd);
    assert_eq!(Value::abs_time(0, 0).kind(), ValueKind::AbsoluteTime);
    assert_eq!(Value::RelativeTime(1.5).type_name(), "relative time");
}

#[test]
fn test_boolean_equivalent() {
    assert_eq!(Value::Boolean(true).boolean_equivalent(), Some(true));
    assert_eq!(Value::Integer(0).boolean_equivalent(), Some(false));
    assert_eq!(Value::Integer(-7).boolean_equivalent(), Some(true));
    assert_eq!(Value::Real(0.0).boolean_equivalent(), Some(false));
    assert_eq!(Value::Real(0.5).boolean_equivalent(), Some(true));
    assert_eq!(Value::string("true").boolean_equivalent(), None);
    assert_eq!(Value::Undefined.boolean_equivalent(), None);
    assert_eq!(Value::Error.boolean_equivalent(), None);
}

#[test]
fn test_exceptional() {
    assert!(Value::Error.is_exceptional());
    assert!(Value::Undefined.is_exceptional());
    assert!(!Value::Null.is_exceptional());
    assert!(!Value::Integer(0).is_exceptional());
}

#[test]
fn test_display_literals() {
    assert_eq!(Value::Integer(-42).to_string(), "-42");
    assert_eq!(Value::Real(1.0).to_string(), "1.0");
    assert_eq!(Value::Real(2.5e-7).to_string(), "2.5e-7");
    assert_eq!(Value::Boolean(false).to_string(), "false");
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Error.to_string(), "error");
    assert_eq!(
        Value::string("say \"hi\"\n").to_string(),
        r#""say \"hi\"\n""#
    );
}

#[test]
fn test_display_composites() {
    let list = Value::list(vec![Value::Integer(1), Value::string("a")]);
    assert_eq!(list.to_string(), r#"{1, "a"}"#);

    let record: Record = [("A", Value::Integer(1)), ("b", Value::Real(2.0))]
        .into_iter()
        .collect();
    assert_eq!(Value::class_ad(record).to_string(), "[A = 1; b = 2.0]");
}

#[test]
fn test_record_lookup_is_case_insensitive() {
    let mut record = Record::new();
    assert_eq!(record.insert("Memory", Value::Integer(1024)), None);
    assert_eq!(record.lookup("memory"), Some(&Value::Integer(1024)));
    assert_eq!(record.lookup("MEMORY"), Some(&Value::Integer(1024)));
    assert_eq!(
        record.insert("MEMORY", Value::Integer(2048)),
        Some(Value::Integer(1024))
    );
    assert_eq!(record.len(), 1);
    assert_eq!(record.iter().next().map(|(n, _)| n), Some("Memory"));
    assert!(record.lookup("Disk").is_none());
}

#[test]
fn test_list_payload_is_shared_on_clone() {
    let a = Value::list(vec![Value::Integer(1)]);
    let b = a.clone();
    match (&a, &b) {
        (Value::List(x), Value::List(y)) => assert!(x.ptr_eq(y)),
        _ => panic!("expected lists"),
    }
}

mod coercion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn both_integer() {
        let (mut a, mut b) = (Value::Integer(1), Value::Integer(2));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Integer);
        assert_eq!((a, b), (Value::Integer(1), Value::Integer(2)));
    }

    #[test]
    fn both_real() {
        let (mut a, mut b) = (Value::Real(1.5), Value::Real(2.5));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Real);
        assert_eq!((a, b), (Value::Real(1.5), Value::Real(2.5)));
    }

    #[test]
    fn integer_left_is_promoted() {
        let (mut a, mut b) = (Value::Integer(3), Value::Real(0.5));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Real);
        assert_eq!(a, Value::Real(3.0));
        assert_eq!(b, Value::Real(0.5));
    }

    #[test]
    fn integer_right_is_promoted() {
        let (mut a, mut b) = (Value::Real(0.5), Value::Integer(3));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Real);
        assert_eq!(a, Value::Real(0.5));
        assert_eq!(b, Value::Real(3.0));
    }

    #[test]
    fn string_wins_over_exceptional() {
        let (mut a, mut b) = (Value::string("x"), Value::Undefined);
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::String);
        let (mut a, mut b) = (Value::Error, Value::string("x"));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::String);
    }

    #[test]
    fn undefined_wins_over_error() {
        let (mut a, mut b) = (Value::Error, Value::Undefined);
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Undefined);
    }

    #[test]
    fn error_marker() {
        let (mut a, mut b) = (Value::Integer(1), Value::Error);
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Error);
        assert_eq!(a, Value::Integer(1));
    }

    #[test]
    fn booleans_become_integers() {
        let (mut a, mut b) = (Value::Boolean(true), Value::Boolean(false));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Integer);
        assert_eq!((a, b), (Value::Integer(1), Value::Integer(0)));

        let (mut a, mut b) = (Value::Boolean(true), Value::Real(2.0));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Real);
        assert_eq!(a, Value::Real(1.0));
    }

    #[test]
    fn non_numeric_markers() {
        let (mut a, mut b) = (Value::list(vec![]), Value::string("x"));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::List);
        let (mut a, mut b) = (Value::Integer(1), Value::class_ad(Record::new()));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::ClassAd);
        let (mut a, mut b) = (Value::Null, Value::Integer(1));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Null);
        let (mut a, mut b) = (Value::abs_time(10, 0), Value::RelativeTime(1.0));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::AbsoluteTime);
        let (mut a, mut b) = (Value::Integer(2), Value::RelativeTime(1.0));
        assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::RelativeTime);
    }
}

mod proptest_coercion {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mixed_promotion_touches_only_the_integer(i in any::<i64>(), r in -1e300f64..1e300) {
            let (mut a, mut b) = (Value::Integer(i), Value::Real(r));
            prop_assert_eq!(coerce_to_number(&mut a, &mut b), ValueKind::Real);
            prop_assert_eq!(a, Value::Real(i as f64));
            prop_assert_eq!(b, Value::Real(r));
        }
    }
}
