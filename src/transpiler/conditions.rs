//! Operator handlers: simple comparisons, EQ/NE/NOT rewrites, AND/OR
//! composition and ranges.

use crate::ast::{Condition, FieldMeta, Key, Operator, Value, WhereMap};
use crate::error::{PredicateError, PredicateResult};
use crate::transpiler::compiler::{Scope, WhereCompiler};
use crate::transpiler::traits::Operand;

impl WhereCompiler {
    /// `left <token> escape(right)`.
    pub(crate) fn compile_simple(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        op: Operator,
        right: &Condition,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let left = left.ok_or(PredicateError::MissingLeftOperand { operator: op })?;
        let token = self.token(op)?;

        // NOT IN over nothing excludes nothing
        if op == Operator::NotIn && matches!(right, Condition::List(items) if items.is_empty()) {
            return Ok(String::new());
        }

        let escape_options = scope.escape_options();
        let right_options = if op.is_pattern() {
            escape_options.accepting_strings()
        } else {
            escape_options
        };
        let right_sql = self.escaper.escape(right, meta, &right_options)?;

        self.joiner
            .join(left, &right_sql, token, scope.options.prefix, &escape_options)
    }

    pub(crate) fn compile_eq(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        right: &Condition,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        match right {
            Condition::Value(Value::Null) => {
                self.compile_simple(left, meta, Operator::Is, right, scope)
            }
            // {field: {gt: 5, lt: 10}}: every nested condition applies to field
            Condition::Map(map) => self.compose_map(left, meta, map, Operator::And, scope),
            Condition::List(_) => self.compile_simple(left, meta, Operator::In, right, scope),
            _ => self.compile_simple(left, meta, Operator::Eq, right, scope),
        }
    }

    pub(crate) fn compile_ne(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        right: &Condition,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let op = match right {
            Condition::Value(Value::Null) => Operator::IsNot,
            Condition::List(_) => Operator::NotIn,
            _ => Operator::Ne,
        };
        self.compile_simple(left, meta, op, right, scope)
    }

    pub(crate) fn compile_not(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        right: &Condition,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let inner = match left {
            // {not: {...}} with no field negates a standalone predicate
            None => self.condition_predicate(right, scope)?,
            Some(_) if right.is_null() => {
                return self.compile_simple(left, meta, Operator::IsNot, right, scope);
            }
            Some(_) if matches!(right, Condition::List(items) if items.is_empty()) => {
                return self.compile_simple(left, meta, Operator::NotIn, right, scope);
            }
            Some(_) => self.dispatch(left, meta, Operator::Eq, right, scope)?,
        };
        if inner.is_empty() {
            return Ok(inner);
        }
        Ok(format!("{} ({})", self.token(Operator::Not)?, inner))
    }

    /// AND / OR over either a list of predicates or a map of conditions.
    pub(crate) fn compose_boolean(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        value: &Condition,
        scope: Scope<'_, '_>,
        op: Operator,
    ) -> PredicateResult<String> {
        match value {
            Condition::List(items) => self.compose_list(items, op, scope),
            Condition::Map(map) => self.compose_map(left, meta, map, op, scope),
            _ => Err(PredicateError::MalformedBoolean { operator: op }),
        }
    }

    /// Each element is an independent predicate; the current left operand
    /// does not apply.
    pub(crate) fn compose_list(
        &self,
        items: &[Condition],
        op: Operator,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let parts = items
            .iter()
            .map(|item| self.condition_predicate(item, scope))
            .collect::<PredicateResult<Vec<_>>>()?;
        self.join_parts(parts, op)
    }

    pub(crate) fn compose_map(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        map: &WhereMap,
        op: Operator,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let mut parts = Vec::with_capacity(map.len());
        for (key, value) in map.iter() {
            let part = match key {
                Key::Op(nested) => {
                    if left.is_none() && !nested.is_boolean() {
                        return Err(PredicateError::InvalidPredicate(format!(
                            "operator '{}' needs a field to compare",
                            nested
                        )));
                    }
                    self.dispatch(left, meta, *nested, value, scope)?
                }
                Key::Field(name) => {
                    let field = self.resolver.resolve_field(name, scope.options);
                    self.dispatch(
                        Some(Operand::Key(&field.column)),
                        Some(&field),
                        Operator::Eq,
                        value,
                        scope,
                    )?
                }
            };
            parts.push(part);
        }
        self.join_parts(parts, op)
    }

    /// A list element seen as a standalone predicate.
    fn condition_predicate(&self, item: &Condition, scope: Scope<'_, '_>) -> PredicateResult<String> {
        let scope = self.descend(scope)?;
        match item {
            Condition::Map(map) => self.attribute_map(map, scope),
            Condition::Instance(instance) => self.instance(instance, scope),
            Condition::Raw(fragment) => self
                .escaper
                .escape_fragment(fragment, &scope.escape_options()),
            Condition::List(items) => self.compose_list(items, Operator::And, scope),
            Condition::Value(Value::Null) => Ok(String::new()),
            Condition::Value(v) => Err(PredicateError::InvalidPredicate(format!(
                "expected a map, instance or fragment, got {}",
                v.kind()
            ))),
        }
    }

    pub(crate) fn compile_range(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        value: &Condition,
        scope: Scope<'_, '_>,
        op: Operator,
    ) -> PredicateResult<String> {
        let left = left.ok_or(PredicateError::MissingLeftOperand { operator: op })?;
        let token = self.token(op)?;
        let escape_options = scope.escape_options();

        let right_sql = match value {
            Condition::Raw(fragment) => self.escaper.escape_fragment(fragment, &escape_options)?,
            Condition::List(bounds) => match bounds.as_slice() {
                [lo, hi] if is_bound(lo) && is_bound(hi) => {
                    format!(
                        "{} {} {}",
                        self.escaper.escape(lo, meta, &escape_options)?,
                        self.token(Operator::And)?,
                        self.escaper.escape(hi, meta, &escape_options)?
                    )
                }
                _ => return Err(PredicateError::MalformedRange { operator: op }),
            },
            _ => return Err(PredicateError::MalformedRange { operator: op }),
        };

        self.joiner
            .join(left, &right_sql, token, scope.options.prefix, &escape_options)
    }

    /// `(p1) OP (p2) ...`, skipping parts that compiled to nothing.
    fn join_parts(&self, parts: Vec<String>, op: Operator) -> PredicateResult<String> {
        let mut parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        match parts.len() {
            0 => Ok(String::new()),
            1 => Ok(parts.remove(0)),
            _ => {
                let separator = format!(" {} ", self.token(op)?);
                Ok(parts
                    .iter()
                    .map(|p| format!("({})", p))
                    .collect::<Vec<_>>()
                    .join(&separator))
            }
        }
    }
}

fn is_bound(bound: &Condition) -> bool {
    matches!(bound, Condition::Value(_) | Condition::Raw(_))
}
