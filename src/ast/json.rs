//! JSON input for predicates.
//!
//! Plain keys are field names, `$`-prefixed keys are operators:
//!
//! ```json
//! { "status": "active", "age": { "$between": [18, 65] }, "$or": [{ "a": 1 }, { "b": 2 }] }
//! ```
//!
//! Single-key objects with a reserved tag build fragments and typed values:
//! `{"$col": "users.id"}`, `{"$fn": ["lower", {"$col": "name"}]}`,
//! `{"$literal": "NOW()"}`, `{"$date": "2024-01-01T00:00:00Z"}` and
//! `{"$where": [left, "$op", right]}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as Json};

use crate::ast::{Condition, Fragment, Instance, Key, LeftOperand, Predicate, Value, WhereMap};
use crate::error::{PredicateError, PredicateResult};

const TAG_COLUMN: &str = "$col";
const TAG_FUNCTION: &str = "$fn";
const TAG_LITERAL: &str = "$literal";
const TAG_DATE: &str = "$date";
const TAG_WHERE: &str = "$where";

impl Predicate {
    /// Build a predicate from JSON. `null` is the absent predicate.
    pub fn from_json(value: &Json) -> PredicateResult<Option<Predicate>> {
        match value {
            Json::Null => Ok(None),
            Json::Object(obj) => {
                if let Some(fragment) = fragment_from_tag(obj)? {
                    return Ok(Some(Predicate::Raw(fragment)));
                }
                if let Some(instance) = instance_from_tag(obj)? {
                    return Ok(Some(Predicate::Instance(instance)));
                }
                Ok(Some(Predicate::Attributes(map_from_json(obj)?)))
            }
            other => Err(PredicateError::InvalidPredicate(format!(
                "expected an object, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse a predicate from JSON text.
    pub fn from_json_str(input: &str) -> PredicateResult<Option<Predicate>> {
        let value: Json = serde_json::from_str(input)?;
        Self::from_json(&value)
    }
}

impl TryFrom<Json> for Predicate {
    type Error = PredicateError;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        Ok(Predicate::from_json(&value)?.unwrap_or_else(|| Predicate::Attributes(WhereMap::new())))
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        Predicate::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn single_tag<'a>(obj: &'a Map<String, Json>, tag: &str) -> Option<&'a Json> {
    if obj.len() == 1 { obj.get(tag) } else { None }
}

fn map_from_json(obj: &Map<String, Json>) -> PredicateResult<WhereMap> {
    let mut map = WhereMap::new();
    for (key, value) in obj {
        let key = if key.starts_with('$') {
            Key::Op(key.parse()?)
        } else {
            Key::Field(key.clone())
        };
        map.push(key, condition_from_json(value)?);
    }
    Ok(map)
}

/// Convert any JSON value into a right-hand condition.
pub fn condition_from_json(value: &Json) -> PredicateResult<Condition> {
    Ok(match value {
        Json::Null => Condition::Value(Value::Null),
        Json::Bool(b) => Condition::Value(Value::Bool(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Condition::Value(Value::Int(i)),
            None => {
                let f = n.as_f64().ok_or_else(|| {
                    PredicateError::invalid_value(format!("unrepresentable number {}", n))
                })?;
                Condition::Value(Value::Float(f))
            }
        },
        Json::String(s) => Condition::Value(Value::String(s.clone())),
        Json::Array(items) => Condition::List(
            items
                .iter()
                .map(condition_from_json)
                .collect::<PredicateResult<Vec<_>>>()?,
        ),
        Json::Object(obj) => {
            if let Some(fragment) = fragment_from_tag(obj)? {
                Condition::Raw(fragment)
            } else if let Some(instance) = instance_from_tag(obj)? {
                Condition::Instance(Box::new(instance))
            } else if let Some(raw) = single_tag(obj, TAG_DATE) {
                Condition::Value(Value::Date(parse_date(raw)?))
            } else {
                Condition::Map(map_from_json(obj)?)
            }
        }
    })
}

fn parse_date(raw: &Json) -> PredicateResult<DateTime<Utc>> {
    let text = raw
        .as_str()
        .ok_or_else(|| PredicateError::invalid_value("$date expects an RFC 3339 string"))?;
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| PredicateError::invalid_value(format!("invalid $date '{}': {}", text, e)))
}

fn fragment_from_tag(obj: &Map<String, Json>) -> PredicateResult<Option<Fragment>> {
    if let Some(raw) = single_tag(obj, TAG_COLUMN) {
        let name = raw
            .as_str()
            .ok_or_else(|| PredicateError::invalid_value("$col expects a column name"))?;
        return Ok(Some(Fragment::Column(name.to_string())));
    }
    if let Some(raw) = single_tag(obj, TAG_LITERAL) {
        let sql = raw
            .as_str()
            .ok_or_else(|| PredicateError::invalid_value("$literal expects a string"))?;
        return Ok(Some(Fragment::Literal(sql.to_string())));
    }
    if let Some(raw) = single_tag(obj, TAG_FUNCTION) {
        return function_from_json(raw).map(Some);
    }
    Ok(None)
}

fn function_from_json(raw: &Json) -> PredicateResult<Fragment> {
    match raw {
        Json::String(name) => Ok(Fragment::Function {
            name: name.clone(),
            args: Vec::new(),
        }),
        Json::Array(items) => {
            let (name, args) = items
                .split_first()
                .and_then(|(name, args)| name.as_str().map(|n| (n, args)))
                .ok_or_else(|| {
                    PredicateError::invalid_value("$fn expects [name, args...] with a string name")
                })?;
            Ok(Fragment::Function {
                name: name.to_string(),
                args: args
                    .iter()
                    .map(condition_from_json)
                    .collect::<PredicateResult<Vec<_>>>()?,
            })
        }
        other => Err(PredicateError::invalid_value(format!(
            "$fn expects a name or [name, args...], got {}",
            json_kind(other)
        ))),
    }
}

fn instance_from_tag(obj: &Map<String, Json>) -> PredicateResult<Option<Instance>> {
    let Some(raw) = single_tag(obj, TAG_WHERE) else {
        return Ok(None);
    };
    let triple = match raw.as_array() {
        Some(items) if items.len() == 3 => items,
        _ => {
            return Err(PredicateError::InvalidPredicate(
                "$where expects [left, operator, right]".to_string(),
            ));
        }
    };

    let left = match &triple[0] {
        Json::String(name) => LeftOperand::Field(name.clone()),
        Json::Object(inner) => match fragment_from_tag(inner)? {
            Some(fragment) => LeftOperand::Fragment(fragment),
            None => {
                return Err(PredicateError::InvalidPredicate(
                    "$where left operand must be a field name or a fragment".to_string(),
                ));
            }
        },
        other => {
            return Err(PredicateError::InvalidPredicate(format!(
                "$where left operand must be a field name or a fragment, got {}",
                json_kind(other)
            )));
        }
    };

    let op = triple[1]
        .as_str()
        .ok_or_else(|| PredicateError::InvalidPredicate("$where operator must be a string".to_string()))?
        .parse()?;

    Ok(Some(Instance {
        left,
        op,
        right: condition_from_json(&triple[2])?,
    }))
}
