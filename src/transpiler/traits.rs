//! Transpiler traits and utilities.
//!
//! The compiler only talks to its collaborators through the four traits
//! below. Every [`SqlGenerator`] gets [`EscapeService`] and [`Joiner`] for
//! free, so a dialect is one struct plus its operator table.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::ast::{Condition, Entity, FieldMeta, Fragment, Operator};
use crate::error::{PredicateError, PredicateResult};
use crate::transpiler::compiler::WhereCompiler;
use crate::transpiler::escape;
use crate::transpiler::operators::OperatorTable;

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
];

/// Escape an identifier if it's a reserved word or contains special chars.
/// Handles dotted identifiers (e.g., `table.column`) by quoting each part.
pub fn escape_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(escape_single_identifier)
            .collect::<Vec<_>>()
            .join(".");
    }
    escape_single_identifier(name)
}

/// Escape a single identifier part (no dots).
fn escape_single_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false);

    if needs_escaping {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Session settings that affect how literals are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectContext {
    /// Offset date literals are rendered in.
    pub timezone: FixedOffset,
}

impl Default for DialectContext {
    fn default() -> Self {
        Self {
            timezone: Utc.fix(),
        }
    }
}

/// Per-call compile options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions<'a> {
    /// Owning entity, used to resolve field names found in nested maps.
    pub entity: Option<&'a Entity>,
    /// Prefix for generated key references (usually a table alias).
    pub prefix: Option<&'a str>,
    pub context: DialectContext,
}

impl<'a> CompileOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: &'a Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_context(mut self, context: DialectContext) -> Self {
        self.context = context;
        self
    }
}

/// Options for a single escape call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeOptions {
    /// Let string values through type validation (pattern operators).
    pub accept_strings: bool,
    pub timezone: FixedOffset,
    /// Nesting already spent by the caller; function arguments count too.
    pub depth: usize,
    pub max_depth: usize,
}

impl Default for EscapeOptions {
    fn default() -> Self {
        Self::from(&DialectContext::default())
    }
}

impl From<&DialectContext> for EscapeOptions {
    fn from(context: &DialectContext) -> Self {
        Self {
            accept_strings: false,
            timezone: context.timezone,
            depth: 0,
            max_depth: WhereCompiler::DEFAULT_MAX_DEPTH,
        }
    }
}

impl EscapeOptions {
    pub fn accepting_strings(mut self) -> Self {
        self.accept_strings = true;
        self
    }

    /// One level deeper, or `DepthExceeded` past `max_depth`.
    pub fn nested(&self) -> PredicateResult<Self> {
        if self.depth >= self.max_depth {
            tracing::warn!("Fragment nesting exceeds max depth {}", self.max_depth);
            return Err(PredicateError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }
}

/// Left operand after normalization: a key to quote and prefix, or a
/// fragment rendered as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Key(&'a str),
    Fragment(&'a Fragment),
}

/// Formats values and fragments as SQL text.
pub trait EscapeService: Send + Sync {
    /// Escape a right-hand value. `meta` drives type validation and
    /// dialect-specific formatting.
    fn escape(
        &self,
        value: &Condition,
        meta: Option<&FieldMeta>,
        options: &EscapeOptions,
    ) -> PredicateResult<String>;

    /// Render a fragment verbatim (function calls, columns, literals).
    fn escape_fragment(&self, fragment: &Fragment, options: &EscapeOptions) -> PredicateResult<String>;
}

/// Maps operators to SQL tokens for one dialect.
pub trait TokenTable: Send + Sync {
    fn token_for(&self, op: Operator) -> Option<&str>;

    /// Dialect name reported in unsupported-operator errors.
    fn dialect_name(&self) -> &str {
        "custom"
    }
}

/// Resolves a field name found inside a nested map.
pub trait FieldResolver: Send + Sync {
    fn resolve_field(&self, name: &str, options: &CompileOptions<'_>) -> FieldMeta;
}

/// Assembles `left <token> right`, quoting and prefixing the left key.
/// A fragment on the left is rendered with the same `options` as the right.
pub trait Joiner: Send + Sync {
    fn join(
        &self,
        left: Operand<'_>,
        right_sql: &str,
        token: &str,
        prefix: Option<&str>,
        options: &EscapeOptions,
    ) -> PredicateResult<String>;
}

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator: Send + Sync {
    /// Short dialect name (e.g. `postgres`).
    fn name(&self) -> &'static str;
    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String;
    /// Get the boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String;
    /// Default operator tokens for this dialect.
    fn operators(&self) -> OperatorTable;

    /// Quote a possibly dotted column reference part by part.
    fn quote_column(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Render a timestamp literal in the given offset.
    fn date_literal(&self, date: &DateTime<Utc>, timezone: FixedOffset) -> String {
        format!(
            "'{}'",
            date.with_timezone(&timezone).format("%Y-%m-%d %H:%M:%S%.3f %:z")
        )
    }

    /// Array literal for array-typed fields; `None` falls back to `(a, b)`.
    fn array_literal(&self, _items: &[String]) -> Option<String> {
        None
    }
}

impl<G: SqlGenerator> EscapeService for G {
    fn escape(
        &self,
        value: &Condition,
        meta: Option<&FieldMeta>,
        options: &EscapeOptions,
    ) -> PredicateResult<String> {
        escape::escape_condition(self, value, meta, options)
    }

    fn escape_fragment(&self, fragment: &Fragment, options: &EscapeOptions) -> PredicateResult<String> {
        escape::render_fragment(self, fragment, options)
    }
}

impl<G: SqlGenerator> Joiner for G {
    fn join(
        &self,
        left: Operand<'_>,
        right_sql: &str,
        token: &str,
        prefix: Option<&str>,
        options: &EscapeOptions,
    ) -> PredicateResult<String> {
        let key = match left {
            Operand::Key(key) => escape::key_reference(self, key, prefix),
            Operand::Fragment(fragment) => escape::render_fragment(self, fragment, options)?,
        };
        Ok(format!("{} {} {}", key, token, right_sql))
    }
}
