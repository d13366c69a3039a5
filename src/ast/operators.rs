use serde::{Deserialize, Serialize};

use crate::error::PredicateError;

/// Predicate operators.
///
/// The first block gets its own handling in the compiler; every other
/// operator is a plain `left <token> right` comparison whose token comes
/// from the dialect's operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Equal (=), rewritten to IS for NULL and IN for lists
    Eq,
    /// Not equal, rewritten to IS NOT for NULL and NOT IN for lists
    Ne,
    /// NOT (...) around a nested condition
    Not,
    /// Conjunction of a list or map of conditions
    And,
    /// Disjunction of a list or map of conditions
    Or,
    /// BETWEEN lo AND hi
    Between,
    /// NOT BETWEEN lo AND hi
    NotBetween,

    /// IS (NULL / TRUE / FALSE)
    Is,
    /// IS NOT
    IsNot,
    /// LIKE pattern match
    Like,
    /// NOT LIKE pattern match
    NotLike,
    /// ILIKE case-insensitive pattern match
    ILike,
    /// NOT ILIKE
    NotILike,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// IN (list)
    In,
    /// NOT IN (list)
    NotIn,

    /// Regular expression match
    Regexp,
    /// Negated regular expression match
    NotRegexp,
    /// Case-insensitive regular expression match
    IRegexp,
    /// Negated case-insensitive regular expression match
    NotIRegexp,
    /// Array / range overlap (&&)
    Overlap,
    /// Contains (@>)
    Contains,
    /// Contained by (<@)
    Contained,
    /// Range adjacency (-|-)
    Adjacent,
    /// Strictly left of (<<)
    StrictLeft,
    /// Strictly right of (>>)
    StrictRight,
    /// Does not extend to the right of (&<)
    NoExtendRight,
    /// Does not extend to the left of (&>)
    NoExtendLeft,
    /// Full text match (@@)
    Match,
    /// Any of the keys exist (?|)
    AnyKeyExists,
    /// All of the keys exist (?&)
    AllKeysExist,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: &'static [Operator] = &[
        Operator::Eq,
        Operator::Ne,
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Between,
        Operator::NotBetween,
        Operator::Is,
        Operator::IsNot,
        Operator::Like,
        Operator::NotLike,
        Operator::ILike,
        Operator::NotILike,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Regexp,
        Operator::NotRegexp,
        Operator::IRegexp,
        Operator::NotIRegexp,
        Operator::Overlap,
        Operator::Contains,
        Operator::Contained,
        Operator::Adjacent,
        Operator::StrictLeft,
        Operator::StrictRight,
        Operator::NoExtendRight,
        Operator::NoExtendLeft,
        Operator::Match,
        Operator::AnyKeyExists,
        Operator::AllKeysExist,
    ];

    /// The key used for this operator in maps and JSON input (without `$`).
    pub fn key(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Between => "between",
            Operator::NotBetween => "notBetween",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::Like => "like",
            Operator::NotLike => "notLike",
            Operator::ILike => "iLike",
            Operator::NotILike => "notILike",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "notRegexp",
            Operator::IRegexp => "iRegexp",
            Operator::NotIRegexp => "notIRegexp",
            Operator::Overlap => "overlap",
            Operator::Contains => "contains",
            Operator::Contained => "contained",
            Operator::Adjacent => "adjacent",
            Operator::StrictLeft => "strictLeft",
            Operator::StrictRight => "strictRight",
            Operator::NoExtendRight => "noExtendRight",
            Operator::NoExtendLeft => "noExtendLeft",
            Operator::Match => "match",
            Operator::AnyKeyExists => "anyKeyExists",
            Operator::AllKeysExist => "allKeysExist",
        }
    }

    /// Look up an operator by key. A leading `$` is accepted.
    pub fn from_key(key: &str) -> Option<Operator> {
        let key = key.strip_prefix('$').unwrap_or(key);
        Self::ALL.iter().copied().find(|op| op.key() == key)
    }

    /// Returns true for operators the compiler rewrites itself instead of
    /// emitting a single `left <token> right` comparison.
    pub fn is_bespoke(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Not
                | Operator::And
                | Operator::Or
                | Operator::Between
                | Operator::NotBetween
        )
    }

    /// Operators that combine or negate predicates and need no field.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not)
    }

    /// Pattern-match operators; their right operand may be a string even
    /// when the field is not textual.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Operator {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_key(s).ok_or_else(|| PredicateError::UnknownOperator(s.to_string()))
    }
}
