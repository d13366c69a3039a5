//! Error types for whereql.

use thiserror::Error;

use crate::ast::Operator;

/// The main error type for predicate compilation.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// The value is not a predicate (neither fragment, map, nor instance).
    #[error("Invalid predicate value: {0}")]
    InvalidPredicate(String),

    /// The operator has no token in the active dialect's table.
    #[error("Operator '{operator}' is not supported in the {dialect} dialect")]
    UnsupportedOperator { operator: Operator, dialect: String },

    /// An operator that needs a left operand was reached without one.
    #[error("Missing left operand for operator '{operator}'")]
    MissingLeftOperand { operator: Operator },

    /// BETWEEN / NOT BETWEEN given something other than a pair or fragment.
    #[error("{operator} expects a 2-element sequence or a raw fragment")]
    MalformedRange { operator: Operator },

    /// AND / OR given something other than a sequence or a map.
    #[error("Expected an object or array for {operator}")]
    MalformedBoolean { operator: Operator },

    /// Operator key that does not name any known operator.
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),

    /// Value that cannot be escaped for its target.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Predicate nesting went past the configured limit.
    #[error("Predicate nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredicateError {
    /// Create an unsupported-operator error for the named dialect.
    pub fn unsupported(operator: Operator, dialect: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator,
            dialect: dialect.into(),
        }
    }

    /// Create an invalid-value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// True for invariant violations upstream of the compiler, as opposed to
    /// errors caused by the predicate the caller supplied.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::MissingLeftOperand { .. })
    }
}

/// Result type alias for predicate compilation.
pub type PredicateResult<T> = Result<T, PredicateError>;
