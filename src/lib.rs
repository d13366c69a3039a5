//! # whereql: predicate trees to SQL
//!
//! whereql compiles nestable predicate descriptions (attribute comparisons,
//! AND/OR groups, ranges, raw fragments) into the boolean expression of a
//! `WHERE`, `HAVING` or `JOIN ... ON` clause, for several SQL dialects.
//!
//! ## Quick Example
//!
//! ```
//! use whereql::prelude::*;
//!
//! let pred = WhereMap::new()
//!     .field("status", "active")
//!     .field("age", WhereMap::new().op(Operator::Gte, 18));
//!
//! assert_eq!(pred.to_sql().unwrap(), "(status = 'active') AND (age >= 18)");
//! assert_eq!(
//!     pred.to_sql_with_dialect(Dialect::MySQL).unwrap(),
//!     "(`status` = 'active') AND (`age` >= 18)"
//! );
//! ```
//!
//! ## Rewrites
//!
//! | Input                    | SQL                 |
//! |--------------------------|---------------------|
//! | `{a: null}`              | `a IS NULL`         |
//! | `{a: {ne: null}}`        | `a IS NOT NULL`     |
//! | `{a: [1, 2]}`            | `a IN (1, 2)`       |
//! | `{a: {not: {gt: 5}}}`    | `NOT (a > 5)`       |
//! | `{a: {between: [1, 9]}}` | `a BETWEEN 1 AND 9` |

pub mod ast;
pub mod config;
pub mod error;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::transpiler::{CompileOptions, Dialect, ToSql, WhereCompiler};
}

/// Compile a JSON predicate for a dialect.
///
/// # Example
///
/// ```
/// use whereql::{compile_json, transpiler::Dialect};
///
/// let sql = compile_json(r#"{"id": {"$in": [1, 2]}}"#, Dialect::SQLite).unwrap();
/// assert_eq!(sql, "\"id\" IN (1, 2)");
/// ```
pub fn compile_json(input: &str, dialect: transpiler::Dialect) -> error::PredicateResult<String> {
    let predicate = ast::Predicate::from_json_str(input)?;
    dialect
        .compiler()
        .compile_predicate(predicate.as_ref(), &transpiler::CompileOptions::default())
}
