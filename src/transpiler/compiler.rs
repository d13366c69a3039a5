//! Predicate normalizer and operator dispatcher.

use std::fmt;
use std::sync::Arc;

use crate::ast::{Condition, FieldMeta, Instance, LeftOperand, Operator, Predicate, WhereMap};
use crate::error::{PredicateError, PredicateResult};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{
    CompileOptions, EscapeOptions, EscapeService, FieldResolver, Joiner, Operand, TokenTable,
};

/// Compiles predicate trees into SQL boolean expressions.
///
/// Holds only its collaborators, so one compiler can serve any number of
/// threads at once.
#[derive(Clone)]
pub struct WhereCompiler {
    pub(crate) escaper: Arc<dyn EscapeService>,
    pub(crate) tokens: Arc<dyn TokenTable>,
    pub(crate) resolver: Arc<dyn FieldResolver>,
    pub(crate) joiner: Arc<dyn Joiner>,
    pub(crate) max_depth: usize,
}

/// Per-call state threaded through the recursion.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'o, 'a> {
    pub(crate) options: &'o CompileOptions<'a>,
    pub(crate) depth: usize,
    max_depth: usize,
}

impl<'o, 'a> Scope<'o, 'a> {
    fn root(options: &'o CompileOptions<'a>, max_depth: usize) -> Self {
        Self {
            options,
            depth: 0,
            max_depth,
        }
    }

    pub(crate) fn escape_options(&self) -> EscapeOptions {
        EscapeOptions {
            depth: self.depth,
            max_depth: self.max_depth,
            ..EscapeOptions::from(&self.options.context)
        }
    }
}

impl WhereCompiler {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new(
        escaper: Arc<dyn EscapeService>,
        tokens: Arc<dyn TokenTable>,
        resolver: Arc<dyn FieldResolver>,
        joiner: Arc<dyn Joiner>,
    ) -> Self {
        Self {
            escaper,
            tokens,
            resolver,
            joiner,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        dialect.compiler()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenTable>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_escaper(mut self, escaper: Arc<dyn EscapeService>) -> Self {
        self.escaper = escaper;
        self
    }

    pub fn with_joiner(mut self, joiner: Arc<dyn Joiner>) -> Self {
        self.joiner = joiner;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn dialect_name(&self) -> &str {
        self.tokens.dialect_name()
    }

    /// Compile a predicate for a WHERE, HAVING or JOIN ... ON clause.
    ///
    /// An absent predicate or an empty map compiles to `""`, which callers
    /// should treat as "no condition".
    pub fn compile_predicate(
        &self,
        predicate: Option<&Predicate>,
        options: &CompileOptions<'_>,
    ) -> PredicateResult<String> {
        let Some(predicate) = predicate else {
            return Ok(String::new());
        };
        let scope = Scope::root(options, self.max_depth);
        let sql = match predicate {
            Predicate::Raw(fragment) => self
                .escaper
                .escape_fragment(fragment, &scope.escape_options())?,
            Predicate::Attributes(map) => self.attribute_map(map, scope)?,
            Predicate::Instance(instance) => self.instance(instance, scope)?,
        };
        tracing::debug!("Compiled {} predicate: {}", self.dialect_name(), sql);
        Ok(sql)
    }

    /// Compile a field/operator map as an implicit top-level AND.
    pub fn compile_attribute_map(
        &self,
        map: &WhereMap,
        options: &CompileOptions<'_>,
    ) -> PredicateResult<String> {
        self.attribute_map(map, Scope::root(options, self.max_depth))
    }

    /// Compile an explicit `(left, op, right)` triple.
    pub fn compile_instance(
        &self,
        instance: &Instance,
        options: &CompileOptions<'_>,
    ) -> PredicateResult<String> {
        self.instance(instance, Scope::root(options, self.max_depth))
    }

    pub(crate) fn attribute_map(&self, map: &WhereMap, scope: Scope<'_, '_>) -> PredicateResult<String> {
        if map.is_empty() {
            return Ok(String::new());
        }
        self.compose_map(None, None, map, Operator::And, scope)
    }

    pub(crate) fn instance(&self, instance: &Instance, scope: Scope<'_, '_>) -> PredicateResult<String> {
        let (left, meta) = match &instance.left {
            LeftOperand::Field(name) => (Operand::Key(name), None),
            LeftOperand::Fragment(fragment) => (Operand::Fragment(fragment), None),
            LeftOperand::Meta(meta) => (Operand::Key(&meta.column), Some(meta)),
        };
        self.dispatch(Some(left), meta, instance.op, &instance.right, scope)
    }

    /// Route `(left, op, right)` to its handler. Operators without bespoke
    /// semantics all share the simple path, so a new operator only needs a
    /// token table entry.
    pub(crate) fn dispatch(
        &self,
        left: Option<Operand<'_>>,
        meta: Option<&FieldMeta>,
        op: Operator,
        right: &Condition,
        scope: Scope<'_, '_>,
    ) -> PredicateResult<String> {
        let scope = self.descend(scope)?;
        tracing::trace!("dispatch {} ({}) at depth {}", op, right.kind(), scope.depth);

        match op {
            Operator::Eq => self.compile_eq(left, meta, right, scope),
            Operator::Ne => self.compile_ne(left, meta, right, scope),
            Operator::Not => self.compile_not(left, meta, right, scope),
            Operator::And | Operator::Or => self.compose_boolean(left, meta, right, scope, op),
            Operator::Between | Operator::NotBetween => {
                self.compile_range(left, meta, right, scope, op)
            }
            Operator::Is
            | Operator::IsNot
            | Operator::Like
            | Operator::NotLike
            | Operator::ILike
            | Operator::NotILike
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::In
            | Operator::NotIn
            | Operator::Regexp
            | Operator::NotRegexp
            | Operator::IRegexp
            | Operator::NotIRegexp
            | Operator::Overlap
            | Operator::Contains
            | Operator::Contained
            | Operator::Adjacent
            | Operator::StrictLeft
            | Operator::StrictRight
            | Operator::NoExtendRight
            | Operator::NoExtendLeft
            | Operator::Match
            | Operator::AnyKeyExists
            | Operator::AllKeysExist => self.compile_simple(left, meta, op, right, scope),
        }
    }

    pub(crate) fn descend<'o, 'a>(&self, scope: Scope<'o, 'a>) -> PredicateResult<Scope<'o, 'a>> {
        if scope.depth >= self.max_depth {
            tracing::warn!("Predicate nesting exceeds max depth {}", self.max_depth);
            return Err(PredicateError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Scope {
            depth: scope.depth + 1,
            ..scope
        })
    }

    pub(crate) fn token(&self, op: Operator) -> PredicateResult<&str> {
        self.tokens
            .token_for(op)
            .ok_or_else(|| PredicateError::unsupported(op, self.tokens.dialect_name()))
    }
}

impl Default for WhereCompiler {
    fn default() -> Self {
        Dialect::default().compiler()
    }
}

impl fmt::Debug for WhereCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhereCompiler")
            .field("dialect", &self.tokens.dialect_name())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
