//! Failure modes: every error aborts the whole compile call.

use crate::ast::builders::*;
use crate::ast::*;
use crate::error::PredicateError;
use crate::transpiler::{CompileOptions, Dialect, ToSql, WhereCompiler};

fn compile(map: WhereMap) -> Result<String, PredicateError> {
    map.to_sql()
}

fn range(op: Operator, value: impl Into<Condition>) -> WhereMap {
    WhereMap::new().field("a", WhereMap::new().op(op, value))
}

#[test]
fn test_malformed_range() {
    let err = compile(range(Operator::Between, 5)).unwrap_err();
    assert!(matches!(err, PredicateError::MalformedRange { operator: Operator::Between }));
    assert_eq!(
        err.to_string(),
        "between expects a 2-element sequence or a raw fragment"
    );

    let short = range(Operator::NotBetween, vec![Condition::from(1)]);
    assert!(matches!(
        compile(short).unwrap_err(),
        PredicateError::MalformedRange { operator: Operator::NotBetween }
    ));

    let long = range(Operator::Between, vec![Condition::from(1), 2.into(), 3.into()]);
    assert!(matches!(compile(long).unwrap_err(), PredicateError::MalformedRange { .. }));

    let nested = range(
        Operator::Between,
        vec![Condition::from(1), Condition::from(WhereMap::new().op(Operator::Gt, 1))],
    );
    assert!(matches!(compile(nested).unwrap_err(), PredicateError::MalformedRange { .. }));
}

#[test]
fn test_malformed_boolean() {
    let err = compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Or, 5))).unwrap_err();
    assert!(matches!(err, PredicateError::MalformedBoolean { operator: Operator::Or }));
    assert_eq!(err.to_string(), "Expected an object or array for or");
}

#[test]
fn test_scalar_in_boolean_list_is_invalid() {
    let err = compile(or([1, 2])).unwrap_err();
    assert!(matches!(err, PredicateError::InvalidPredicate(_)));
}

#[test]
fn test_operator_without_field_is_invalid() {
    let cases = [
        WhereMap::new().op(Operator::Gt, 5),
        WhereMap::new().op(Operator::Between, vec![Condition::from(1), 2.into()]),
        WhereMap::new().op(Operator::Or, WhereMap::new().op(Operator::Eq, 1)),
        not(WhereMap::new().op(Operator::Like, "a%")),
        not(5),
    ];
    for map in cases {
        let err = compile(map).unwrap_err();
        assert!(matches!(err, PredicateError::InvalidPredicate(_)), "{err:?}");
        assert!(!err.is_internal());
    }

    let json = crate::compile_json(r#"{"$gt": 5}"#, Dialect::Postgres).unwrap_err();
    assert_eq!(
        json.to_string(),
        "Invalid predicate value: operator 'gt' needs a field to compare"
    );
}

#[test]
fn test_user_errors_are_not_internal() {
    let err = compile(range(Operator::Between, 5)).unwrap_err();
    assert!(!err.is_internal());
}

#[test]
fn test_unrepresentable_values() {
    let nan = compile(WhereMap::new().field("a", f64::NAN)).unwrap_err();
    assert!(matches!(nan, PredicateError::InvalidValue(_)));

    let map_value = compile(WhereMap::new().field(
        "a",
        WhereMap::new().op(Operator::Gt, WhereMap::new().field("b", 1)),
    ))
    .unwrap_err();
    assert!(matches!(map_value, PredicateError::InvalidValue(_)));
}

#[test]
fn test_no_partial_output() {
    // The first entry is fine; the second fails and takes the whole call down.
    let map = WhereMap::new()
        .field("ok", 1)
        .field("bad", WhereMap::new().op(Operator::Between, 5));
    assert!(compile(map).is_err());
}

#[test]
fn test_depth_limit() {
    let mut pred = WhereMap::new().field("a", 1);
    for _ in 0..10 {
        pred = not(pred);
    }

    let shallow = WhereCompiler::for_dialect(Dialect::Postgres).with_max_depth(4);
    let err = shallow
        .compile_attribute_map(&pred, &CompileOptions::new())
        .unwrap_err();
    assert!(matches!(err, PredicateError::DepthExceeded { limit: 4 }));

    let sql = WhereCompiler::default()
        .compile_attribute_map(&pred, &CompileOptions::new())
        .unwrap();
    assert!(sql.starts_with("NOT (NOT ("));
    assert!(sql.ends_with("a = 1))))))))))"));
}

#[test]
fn test_depth_limit_covers_function_arguments() {
    let mut fragment = col("a");
    for _ in 0..10 {
        fragment = func("coalesce", [fragment]);
    }
    let pred = where_(fragment, Operator::Eq, 1);

    let shallow = WhereCompiler::for_dialect(Dialect::Postgres).with_max_depth(4);
    let err = shallow
        .compile_instance(&pred, &CompileOptions::new())
        .unwrap_err();
    assert!(matches!(err, PredicateError::DepthExceeded { limit: 4 }));

    let sql = WhereCompiler::default()
        .compile_instance(&pred, &CompileOptions::new())
        .unwrap();
    assert!(sql.starts_with("coalesce(coalesce("));
    assert!(sql.ends_with("a)))))))))) = 1"));
}

#[test]
fn test_pathological_nesting_fails_cleanly() {
    let mut pred = WhereMap::new().field("a", 1);
    for _ in 0..500 {
        pred = and([pred]);
    }
    let err = pred.to_sql().unwrap_err();
    assert!(matches!(
        err,
        PredicateError::DepthExceeded {
            limit: WhereCompiler::DEFAULT_MAX_DEPTH
        }
    ));
}
