//! Operator token tables.

use std::collections::BTreeMap;

use crate::ast::Operator;
use crate::transpiler::traits::TokenTable;

/// Operator -> SQL token mapping for one dialect.
///
/// Adding an operator to a dialect only takes a new entry here; the
/// compiler sends every non-bespoke operator through the same path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorTable {
    dialect: String,
    tokens: BTreeMap<Operator, String>,
}

impl OperatorTable {
    /// Empty table.
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            tokens: BTreeMap::new(),
        }
    }

    /// Tokens every supported dialect understands.
    pub fn standard(dialect: impl Into<String>) -> Self {
        Self::new(dialect)
            .with(Operator::Eq, "=")
            .with(Operator::Ne, "!=")
            .with(Operator::Not, "NOT")
            .with(Operator::And, "AND")
            .with(Operator::Or, "OR")
            .with(Operator::Between, "BETWEEN")
            .with(Operator::NotBetween, "NOT BETWEEN")
            .with(Operator::Is, "IS")
            .with(Operator::IsNot, "IS NOT")
            .with(Operator::Like, "LIKE")
            .with(Operator::NotLike, "NOT LIKE")
            .with(Operator::Gt, ">")
            .with(Operator::Gte, ">=")
            .with(Operator::Lt, "<")
            .with(Operator::Lte, "<=")
            .with(Operator::In, "IN")
            .with(Operator::NotIn, "NOT IN")
    }

    /// Set a token (builder style).
    pub fn with(mut self, op: Operator, token: impl Into<String>) -> Self {
        self.set(op, token);
        self
    }

    /// Remove an operator (builder style).
    pub fn without(mut self, op: Operator) -> Self {
        self.remove(op);
        self
    }

    pub fn set(&mut self, op: Operator, token: impl Into<String>) {
        self.tokens.insert(op, token.into());
    }

    pub fn remove(&mut self, op: Operator) {
        self.tokens.remove(&op);
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operator, &str)> {
        self.tokens.iter().map(|(op, token)| (*op, token.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenTable for OperatorTable {
    fn token_for(&self, op: Operator) -> Option<&str> {
        self.tokens.get(&op).map(String::as_str)
    }

    fn dialect_name(&self) -> &str {
        &self.dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_core_operators() {
        let table = OperatorTable::standard("ansi");
        for op in [Operator::Eq, Operator::Ne, Operator::Between, Operator::In] {
            assert!(table.token_for(op).is_some(), "{} missing", op);
        }
        assert_eq!(table.token_for(Operator::ILike), None);
        assert_eq!(table.dialect_name(), "ansi");
    }

    #[test]
    fn test_overrides() {
        let table = OperatorTable::standard("ansi")
            .with(Operator::Ne, "<>")
            .without(Operator::Like);
        assert_eq!(table.token_for(Operator::Ne), Some("<>"));
        assert_eq!(table.token_for(Operator::Like), None);
    }
}
