//! Value escaping shared by all dialect generators.

use chrono::{DateTime, Utc};

use crate::ast::{Condition, FieldMeta, Fragment, Value, ValueType};
use crate::error::{PredicateError, PredicateResult};
use crate::transpiler::traits::{EscapeOptions, SqlGenerator};

/// Escape a right-hand condition: values, fragments and lists of either.
pub(crate) fn escape_condition<G: SqlGenerator + ?Sized>(
    generator: &G,
    value: &Condition,
    meta: Option<&FieldMeta>,
    options: &EscapeOptions,
) -> PredicateResult<String> {
    match value {
        Condition::Value(v) => escape_value(generator, v, meta, options),
        Condition::Raw(fragment) => render_fragment(generator, fragment, options),
        Condition::List(items) => {
            let parts = items
                .iter()
                .map(|item| match item {
                    Condition::Value(_) | Condition::Raw(_) => {
                        escape_condition(generator, item, meta, options)
                    }
                    other => Err(PredicateError::invalid_value(format!(
                        "list items must be values or fragments, got {}",
                        other.kind()
                    ))),
                })
                .collect::<PredicateResult<Vec<_>>>()?;

            let is_array = meta.is_some_and(|m| m.value_type == ValueType::Array);
            if is_array {
                if let Some(array) = generator.array_literal(&parts) {
                    return Ok(array);
                }
            }
            if parts.is_empty() {
                Ok("(NULL)".to_string())
            } else {
                Ok(format!("({})", parts.join(", ")))
            }
        }
        Condition::Map(_) | Condition::Instance(_) => Err(PredicateError::invalid_value(format!(
            "cannot escape a {} as a value",
            value.kind()
        ))),
    }
}

/// Render a fragment. Columns are quoted, literals pass through untouched,
/// function arguments are escaped recursively.
pub(crate) fn render_fragment<G: SqlGenerator + ?Sized>(
    generator: &G,
    fragment: &Fragment,
    options: &EscapeOptions,
) -> PredicateResult<String> {
    match fragment {
        Fragment::Column(name) => Ok(generator.quote_column(name)),
        Fragment::Literal(sql) => Ok(sql.clone()),
        Fragment::Function { name, args } => {
            let options = options.nested()?;
            let args = args
                .iter()
                .map(|arg| escape_condition(generator, arg, None, &options))
                .collect::<PredicateResult<Vec<_>>>()?;
            Ok(format!("{}({})", name, args.join(", ")))
        }
    }
}

/// Render a key reference. `$table.column$` and dotted keys are qualified
/// already and never get the prefix.
pub(crate) fn key_reference<G: SqlGenerator + ?Sized>(
    generator: &G,
    key: &str,
    prefix: Option<&str>,
) -> String {
    if let Some(nested) = key.strip_prefix('$').and_then(|k| k.strip_suffix('$')) {
        return generator.quote_column(nested);
    }
    if key.contains('.') {
        return generator.quote_column(key);
    }
    match prefix {
        Some(prefix) => format!(
            "{}.{}",
            generator.quote_column(prefix),
            generator.quote_identifier(key)
        ),
        None => generator.quote_identifier(key),
    }
}

fn escape_value<G: SqlGenerator + ?Sized>(
    generator: &G,
    value: &Value,
    meta: Option<&FieldMeta>,
    options: &EscapeOptions,
) -> PredicateResult<String> {
    let value_type = meta.map(|m| m.value_type).unwrap_or_default();
    validate(value, value_type, meta, options)?;

    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(generator.bool_literal(*b)),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) if f.is_finite() => Ok(f.to_string()),
        Value::Float(f) => Err(PredicateError::invalid_value(format!(
            "{} cannot be written as a SQL number",
            f
        ))),
        Value::String(s) => {
            if value_type == ValueType::Date {
                if let Some(date) = parse_date(s) {
                    return Ok(generator.date_literal(&date, options.timezone));
                }
            }
            Ok(generator.quote_string(s))
        }
        Value::Date(date) => Ok(generator.date_literal(date, options.timezone)),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Check a value against the declared type of the field it is compared to.
fn validate(
    value: &Value,
    value_type: ValueType,
    meta: Option<&FieldMeta>,
    options: &EscapeOptions,
) -> PredicateResult<()> {
    let valid = match (value_type, value) {
        (_, Value::Null) => true,
        (ValueType::Unknown | ValueType::String | ValueType::Json | ValueType::Array, _) => true,
        (ValueType::Integer, Value::Int(_)) => true,
        (ValueType::Integer, Value::Float(f)) => f.fract() == 0.0,
        (ValueType::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
        (ValueType::Float, Value::Int(_) | Value::Float(_)) => true,
        (ValueType::Float, Value::String(s)) => s.trim().parse::<f64>().is_ok(),
        (ValueType::Boolean, Value::Bool(_)) => true,
        (ValueType::Boolean, Value::Int(n)) => *n == 0 || *n == 1,
        (ValueType::Boolean, Value::String(s)) => {
            matches!(s.as_str(), "true" | "false" | "t" | "f" | "1" | "0")
        }
        (ValueType::Date, Value::Date(_)) => true,
        (ValueType::Date, Value::String(s)) => parse_date(s).is_some(),
        _ => false,
    };

    if valid || (options.accept_strings && matches!(value, Value::String(_))) {
        return Ok(());
    }

    let field = meta.map(|m| m.name.as_str()).unwrap_or("?");
    Err(PredicateError::invalid_value(format!(
        "{} is not a valid {} for field '{}'",
        value, value_type, field
    )))
}
