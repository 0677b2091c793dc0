//! Error taxonomy for dispatch and evaluation.
//!
//! A resolver that declines a request returns `Ok(None)`; that is never an
//! error. Everything below is terminal for a single evaluation step.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Every property accessor declined the read.
    #[error("Cannot read property: {property} of target: {target_type}")]
    PropertyNotFound {
        property: String,
        target_type: String,
    },

    /// Implicit properties are a read-only projection.
    #[error("Cannot write property: {property} of target: {target_type}")]
    WriteNotSupported {
        property: String,
        target_type: String,
    },

    #[error("{what}: expected {expected} argument(s), got {actual}")]
    ArityMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Values are not mutually comparable: {0}")]
    NotComparable(String),

    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("Method not found: {method} on {target_type}")]
    MethodNotFound { method: String, target_type: String },

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Type not found: {0}")]
    TypeNotFound(String),

    #[error("Constructor not found: {type_name}{signature}")]
    ConstructorNotFound {
        type_name: String,
        signature: String,
    },
}

impl EvalError {
    pub fn arity(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        EvalError::ArityMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    pub fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        EvalError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_not_found_names_target_and_property() {
        let err = EvalError::PropertyNotFound {
            property: "sorted".to_string(),
            target_type: "lang.Integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot read property: sorted of target: lang.Integer"
        );
    }

    #[test]
    fn test_arity_message() {
        let err = EvalError::arity("map keys and values", 3, 2);
        assert_eq!(
            err.to_string(),
            "map keys and values: expected 3 argument(s), got 2"
        );
    }
}
