//! Ergonomic builder functions for predicates.
//!
//! # Example
//! ```
//! use whereql::ast::builders::*;
//! use whereql::transpiler::ToSql;
//!
//! let pred = or([eq("role", "admin"), gt("karma", 100)]);
//! assert_eq!(pred.to_sql().unwrap(), "(role = 'admin') OR (karma > 100)");
//! ```

use crate::ast::{Condition, Fragment, Instance, LeftOperand, Operator, Value, WhereMap};

fn compare(field: &str, op: Operator, value: impl Into<Condition>) -> Instance {
    Instance::new(LeftOperand::Field(field.to_string()), op, value)
}

/// field = value (IS NULL for a null value)
pub fn eq(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Eq, value)
}

/// field != value (IS NOT NULL for a null value)
pub fn ne(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Ne, value)
}

/// field > value
pub fn gt(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Gt, value)
}

/// field >= value
pub fn gte(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Gte, value)
}

/// field < value
pub fn lt(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Lt, value)
}

/// field <= value
pub fn lte(field: &str, value: impl Into<Condition>) -> Instance {
    compare(field, Operator::Lte, value)
}

/// field LIKE pattern
pub fn like(field: &str, pattern: &str) -> Instance {
    compare(field, Operator::Like, pattern)
}

/// field ILIKE pattern
pub fn ilike(field: &str, pattern: &str) -> Instance {
    compare(field, Operator::ILike, pattern)
}

/// field NOT LIKE pattern
pub fn not_like(field: &str, pattern: &str) -> Instance {
    compare(field, Operator::NotLike, pattern)
}

/// field BETWEEN lo AND hi
pub fn between(field: &str, lo: impl Into<Condition>, hi: impl Into<Condition>) -> Instance {
    compare(field, Operator::Between, Condition::List(vec![lo.into(), hi.into()]))
}

/// field NOT BETWEEN lo AND hi
pub fn not_between(field: &str, lo: impl Into<Condition>, hi: impl Into<Condition>) -> Instance {
    compare(field, Operator::NotBetween, Condition::List(vec![lo.into(), hi.into()]))
}

/// field IN (values...)
pub fn is_in<V: Into<Condition>>(field: &str, values: impl IntoIterator<Item = V>) -> Instance {
    let items = values.into_iter().map(Into::into).collect();
    compare(field, Operator::In, Condition::List(items))
}

/// field NOT IN (values...)
pub fn not_in<V: Into<Condition>>(field: &str, values: impl IntoIterator<Item = V>) -> Instance {
    let items = values.into_iter().map(Into::into).collect();
    compare(field, Operator::NotIn, Condition::List(items))
}

/// field IS NULL
pub fn is_null(field: &str) -> Instance {
    compare(field, Operator::Eq, Value::Null)
}

/// field IS NOT NULL
pub fn is_not_null(field: &str) -> Instance {
    compare(field, Operator::Ne, Value::Null)
}

/// Explicit `(left, op, right)` triple.
pub fn where_(left: impl Into<LeftOperand>, op: Operator, right: impl Into<Condition>) -> Instance {
    Instance::new(left.into(), op, right)
}

fn group<C: Into<Condition>>(op: Operator, items: impl IntoIterator<Item = C>) -> WhereMap {
    let items = items.into_iter().map(Into::into).collect::<Vec<_>>();
    WhereMap::new().op(op, Condition::List(items))
}

/// (a) AND (b) AND ...
pub fn and<C: Into<Condition>>(items: impl IntoIterator<Item = C>) -> WhereMap {
    group(Operator::And, items)
}

/// (a) OR (b) OR ...
pub fn or<C: Into<Condition>>(items: impl IntoIterator<Item = C>) -> WhereMap {
    group(Operator::Or, items)
}

/// NOT (inner)
pub fn not(inner: impl Into<Condition>) -> WhereMap {
    WhereMap::new().op(Operator::Not, inner)
}

/// Column reference, `table.column` allowed.
pub fn col(name: &str) -> Fragment {
    Fragment::Column(name.to_string())
}

/// Function call fragment.
pub fn func<C: Into<Condition>>(name: &str, args: impl IntoIterator<Item = C>) -> Fragment {
    Fragment::Function {
        name: name.to_string(),
        args: args.into_iter().map(Into::into).collect(),
    }
}

/// Verbatim SQL fragment. Nothing in it is escaped.
pub fn literal(sql: &str) -> Fragment {
    Fragment::Literal(sql.to_string())
}
