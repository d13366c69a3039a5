//! SQL transpiler for predicate trees.
//!
//! [`WhereCompiler`] walks a [`Predicate`] and emits the boolean expression
//! for a WHERE, HAVING or JOIN ... ON clause. Dialect differences live
//! behind the collaborator traits in [`traits`].

pub mod compiler;
mod conditions;
pub mod dialect;
mod escape;
pub mod operators;
pub mod resolver;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

pub use compiler::WhereCompiler;
pub use dialect::Dialect;
pub use operators::OperatorTable;
pub use resolver::EntityResolver;
pub use traits::{
    escape_identifier, CompileOptions, DialectContext, EscapeOptions, EscapeService,
    FieldResolver, Joiner, Operand, SqlGenerator, TokenTable, RESERVED_WORDS,
};

use crate::ast::{Instance, Predicate, WhereMap};
use crate::error::PredicateResult;

/// Trait for converting predicate nodes to SQL.
pub trait ToSql {
    /// Convert this node to SQL for the default dialect (Postgres).
    fn to_sql(&self) -> PredicateResult<String> {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Convert this node to SQL for a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> PredicateResult<String>;
}

impl ToSql for Predicate {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> PredicateResult<String> {
        dialect
            .compiler()
            .compile_predicate(Some(self), &CompileOptions::default())
    }
}

impl ToSql for WhereMap {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> PredicateResult<String> {
        dialect
            .compiler()
            .compile_attribute_map(self, &CompileOptions::default())
    }
}

impl ToSql for Instance {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> PredicateResult<String> {
        dialect
            .compiler()
            .compile_instance(self, &CompileOptions::default())
    }
}
