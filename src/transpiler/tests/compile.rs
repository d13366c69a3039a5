//! Predicate compilation tests (Postgres token table).

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::*;
use crate::transpiler::*;

fn compiler() -> WhereCompiler {
    Dialect::Postgres.compiler()
}

fn compile(map: WhereMap) -> String {
    compile_with(map, &CompileOptions::new())
}

fn compile_with(map: WhereMap, options: &CompileOptions<'_>) -> String {
    compiler()
        .compile_predicate(Some(&Predicate::from(map)), options)
        .unwrap()
}

fn pair(lo: i64, hi: i64) -> Condition {
    Condition::List(vec![lo.into(), hi.into()])
}

#[test]
fn test_empty_and_absent_predicates() {
    assert_eq!(compile(WhereMap::new()), "");
    assert_eq!(
        compiler()
            .compile_predicate(None, &CompileOptions::new())
            .unwrap(),
        ""
    );
}

#[test]
fn test_simple_equality() {
    assert_eq!(compile(WhereMap::new().field("a", 5)), "a = 5");
    assert_eq!(compile(WhereMap::new().field("name", "bob")), "name = 'bob'");
    assert_eq!(compile(WhereMap::new().field("active", true)), "active = true");
}

#[test]
fn test_null_rewrites() {
    assert_eq!(compile(WhereMap::new().field("a", Value::Null)), "a IS NULL");
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Ne, Value::Null))),
        "a IS NOT NULL"
    );
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Not, Value::Null))),
        "a IS NOT NULL"
    );
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Is, Value::Null))),
        "a IS NULL"
    );
}

#[test]
fn test_ne_uses_inequality_token() {
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Ne, 5))),
        "a != 5"
    );
    assert_eq!(ne("status", "closed").to_sql().unwrap(), "status != 'closed'");
}

#[test]
fn test_lists_become_in() {
    assert_eq!(
        compile(WhereMap::new().field("id", vec![Condition::from(1), 2.into(), 3.into()])),
        "id IN (1, 2, 3)"
    );
    assert_eq!(
        compile(WhereMap::new().field(
            "id",
            WhereMap::new().op(Operator::Ne, vec![Condition::from(1), Condition::from(2)])
        )),
        "id NOT IN (1, 2)"
    );
    assert_eq!(compile(WhereMap::new().field("id", Vec::<Condition>::new())), "id IN (NULL)");
    assert_eq!(is_in("role", ["admin", "owner"]).to_sql().unwrap(), "role IN ('admin', 'owner')");
}

#[test]
fn test_negated_empty_list_drops_out() {
    let empty = || Vec::<Condition>::new();
    assert_eq!(compile(WhereMap::new().field("id", WhereMap::new().op(Operator::Ne, empty()))), "");
    assert_eq!(compile(WhereMap::new().field("id", WhereMap::new().op(Operator::NotIn, empty()))), "");
    assert_eq!(compile(WhereMap::new().field("id", WhereMap::new().op(Operator::Not, empty()))), "");
    assert_eq!(
        compile(
            WhereMap::new()
                .field("id", WhereMap::new().op(Operator::NotIn, empty()))
                .field("active", true)
        ),
        "active = true"
    );
    assert_eq!(not_in("role", Vec::<&str>::new()).to_sql().unwrap(), "");
}

#[test]
fn test_multiple_fields_and_together() {
    let map = WhereMap::new().field("a", 1).field("b", "x");
    assert_eq!(compile(map), "(a = 1) AND (b = 'x')");
}

#[test]
fn test_insertion_order_is_output_order() {
    let map = WhereMap::new().field("z", 1).field("a", 2).field("m", 3);
    assert_eq!(compile(map), "(z = 1) AND (a = 2) AND (m = 3)");
}

#[test]
fn test_or_list_and_map_forms_agree() {
    let list = or([WhereMap::new().field("a", 1), WhereMap::new().field("b", 2)]);
    let map = WhereMap::new().op(Operator::Or, WhereMap::new().field("a", 1).field("b", 2));

    assert_eq!(compile(list), "(a = 1) OR (b = 2)");
    assert_eq!(compile(map), "(a = 1) OR (b = 2)");
}

#[test]
fn test_builders_compose() {
    let pred = and([
        Condition::from(or([eq("a", 1), eq("b", 2)])),
        Condition::from(gt("c", 3)),
    ]);
    assert_eq!(pred.to_sql().unwrap(), "((a = 1) OR (b = 2)) AND (c > 3)");
}

#[test]
fn test_nested_operator_map_is_implicit_and() {
    let map = WhereMap::new().field("age", WhereMap::new().op(Operator::Gte, 18).op(Operator::Lt, 65));
    assert_eq!(compile(map), "(age >= 18) AND (age < 65)");
}

#[test]
fn test_or_map_against_same_field() {
    let map = WhereMap::new().field(
        "a",
        WhereMap::new().op(Operator::Or, WhereMap::new().op(Operator::Gt, 5).op(Operator::Lt, 0)),
    );
    assert_eq!(compile(map), "(a > 5) OR (a < 0)");
}

#[test]
fn test_plain_key_inside_nested_map_is_a_new_field() {
    let map = WhereMap::new().field("a", WhereMap::new().field("b", 1));
    assert_eq!(compile(map), "b = 1");
}

#[test]
fn test_between() {
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::Between, pair(1, 10)))),
        "a BETWEEN 1 AND 10"
    );
    assert_eq!(
        compile(WhereMap::new().field("a", WhereMap::new().op(Operator::NotBetween, pair(1, 10)))),
        "a NOT BETWEEN 1 AND 10"
    );
    assert_eq!(between("age", 18, 65).to_sql().unwrap(), "age BETWEEN 18 AND 65");
}

#[test]
fn test_between_raw_fragment() {
    let range = literal("NOW() - INTERVAL '1 day' AND NOW()");
    let map = WhereMap::new().field("seen_at", WhereMap::new().op(Operator::Between, range));
    assert_eq!(compile(map), "seen_at BETWEEN NOW() - INTERVAL '1 day' AND NOW()");
}

#[test]
fn test_not_wraps_inner() {
    let map = WhereMap::new().field("a", WhereMap::new().op(Operator::Not, WhereMap::new().op(Operator::Gt, 5)));
    assert_eq!(compile(map), "NOT (a > 5)");

    let scalar = WhereMap::new().field("a", WhereMap::new().op(Operator::Not, 5));
    assert_eq!(compile(scalar), "NOT (a = 5)");

    assert_eq!(compile(not(WhereMap::new().field("a", 1).field("b", 2))), "NOT ((a = 1) AND (b = 2))");
}

#[test]
fn test_empty_groups_vanish() {
    assert_eq!(compile(not(WhereMap::new())), "");
    assert_eq!(compile(WhereMap::new().field("a", WhereMap::new()).field("b", 1)), "b = 1");
    assert_eq!(
        compile(or([Condition::Value(Value::Null), Condition::from(eq("a", 1))])),
        "a = 1"
    );
}

#[test]
fn test_compile_is_idempotent() {
    let compiler = compiler();
    let pred = Predicate::from(
        WhereMap::new()
            .field("a", 1)
            .op(Operator::Or, vec![Condition::from(eq("b", 2)), Condition::from(lt("c", 3))]),
    );
    let opts = CompileOptions::new().with_prefix("t");

    let first = compiler.compile_predicate(Some(&pred), &opts).unwrap();
    let second = compiler.compile_predicate(Some(&pred), &opts).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "(t.a = 1) AND ((t.b = 2) OR (t.c < 3))");
}

#[test]
fn test_prefix_and_quoting() {
    let opts = CompileOptions::new().with_prefix("u");
    assert_eq!(compile_with(WhereMap::new().field("name", "bob"), &opts), "u.name = 'bob'");
    assert_eq!(compile_with(WhereMap::new().field("order", 1), &opts), "u.\"order\" = 1");
    assert_eq!(
        compile_with(WhereMap::new().field("$profile.city$", "Paris"), &opts),
        "profile.city = 'Paris'"
    );
    assert_eq!(compile(WhereMap::new().field("user", 1)), "\"user\" = 1");
}

#[test]
fn test_entity_columns_and_types() {
    let users = Entity::new("users")
        .field(FieldMeta::new("firstName", ValueType::String).with_column("first_name"))
        .field(FieldMeta::new("age", ValueType::Integer));
    let opts = CompileOptions::new().with_entity(&users);

    assert_eq!(
        compile_with(WhereMap::new().field("firstName", "Ann"), &opts),
        "first_name = 'Ann'"
    );
    assert_eq!(
        compile_with(WhereMap::new().field("age", WhereMap::new().op(Operator::Like, "1%")), &opts),
        "age LIKE '1%'"
    );

    let err = compiler()
        .compile_attribute_map(&WhereMap::new().field("age", "abc"), &opts)
        .unwrap_err();
    assert!(matches!(err, crate::error::PredicateError::InvalidValue(_)));
}

#[test]
fn test_instances() {
    assert_eq!(gt("karma", 100).to_sql().unwrap(), "karma > 100");
    assert_eq!(is_null("deleted_at").to_sql().unwrap(), "deleted_at IS NULL");
    assert_eq!(is_not_null("deleted_at").to_sql().unwrap(), "deleted_at IS NOT NULL");
    assert_eq!(ilike("email", "%@x.com").to_sql().unwrap(), "email ILIKE '%@x.com'");

    let created = FieldMeta::new("createdAt", ValueType::Date).with_column("created_at");
    let inst = where_(created, Operator::Gte, "2024-01-01T00:00:00Z");
    assert_eq!(inst.to_sql().unwrap(), "created_at >= '2024-01-01 00:00:00.000 +00:00'");
}

#[test]
fn test_fragments() {
    assert_eq!(Predicate::Raw(literal("1 = 1")).to_sql().unwrap(), "1 = 1");

    let lowered = where_(func("lower", [col("name")]), Operator::Eq, "bob");
    assert_eq!(lowered.to_sql().unwrap(), "lower(name) = 'bob'");

    assert_eq!(eq("a", col("t.b")).to_sql().unwrap(), "a = t.b");

    let opts = CompileOptions::new().with_prefix("u");
    let sql = compiler().compile_instance(&lowered, &opts).unwrap();
    assert_eq!(sql, "lower(name) = 'bob'");
}

#[test]
fn test_dates_follow_session_timezone() {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let context = DialectContext {
        timezone: FixedOffset::east_opt(2 * 3600).unwrap(),
    };
    let opts = CompileOptions::new().with_context(context);
    assert_eq!(
        compile_with(WhereMap::new().field("at", date), &opts),
        "at = '2024-01-01 02:00:00.000 +02:00'"
    );
}

#[test]
fn test_left_function_follows_session_timezone() {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let context = DialectContext {
        timezone: FixedOffset::east_opt(2 * 3600).unwrap(),
    };
    let opts = CompileOptions::new().with_context(context);
    let latest = where_(
        func("greatest", [Condition::from(date), Condition::Raw(col("b"))]),
        Operator::Eq,
        date,
    );
    assert_eq!(
        compiler().compile_instance(&latest, &opts).unwrap(),
        "greatest('2024-01-01 02:00:00.000 +02:00', b) = '2024-01-01 02:00:00.000 +02:00'"
    );
}

#[test]
fn test_top_level_not_negates_predicates() {
    assert_eq!(compile(not(eq("a", 1))), "NOT (a = 1)");
    assert_eq!(compile(not(Value::Null)), "");
    assert_eq!(compile(and([not(WhereMap::new().field("a", 1))])), "NOT (a = 1)");
}

#[test]
fn test_custom_collaborators() {
    struct Upper;

    impl FieldResolver for Upper {
        fn resolve_field(&self, name: &str, _options: &CompileOptions<'_>) -> FieldMeta {
            FieldMeta::untyped(name).with_column(name.to_uppercase())
        }
    }

    let tokens = OperatorTable::standard("ansi").with(Operator::Ne, "<>");
    let compiler = compiler()
        .with_tokens(Arc::new(tokens))
        .with_resolver(Arc::new(Upper));
    let map = WhereMap::new().field("a", WhereMap::new().op(Operator::Ne, 1));

    let sql = compiler
        .compile_attribute_map(&map, &CompileOptions::new())
        .unwrap();
    assert_eq!(sql, "A <> 1");
    assert_eq!(compiler.dialect_name(), "ansi");
}

#[test]
fn test_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WhereCompiler>();

    let compiler = compiler();
    let map = WhereMap::new().field("a", 1).field("b", 2);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| compiler.compile_attribute_map(&map, &CompileOptions::new())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "(a = 1) AND (b = 2)");
        }
    });
}
