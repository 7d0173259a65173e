//! Runtime error types
//!
//! Fatal failures raised while executing compiled implementations. Schema
//! operations that fail recoverably return `{:error, ...}` values instead.

use thiserror::Error;

use crate::value::Value;

fn format_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runtime error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// A validated parameter (or schema field) was rejected by its value module.
    #[error("ValidationError: validation error for {name}: {diagnostic} (got {value})")]
    ValidationAbort {
        name: String,
        value: Value,
        diagnostic: String,
    },

    /// No clause of a multi-clause function accepted the arguments.
    #[error("NoClauseMatch: no clause of {function} matches ({})", format_values(.args))]
    NoClauseMatch { function: String, args: Vec<Value> },

    #[error("UndefinedFunctionError: {0} is undefined")]
    UndefinedFunction(String),

    #[error("UnknownModuleError: no value module named {0}")]
    UnknownModule(String),

    #[error("TypeError: {0}")]
    TypeError(String),

    #[error("ArityError: {function} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("DivideError: division by zero")]
    DivisionByZero,

    #[error("OverflowError: {0}")]
    Overflow(String),

    #[error("StackOverflowError: call depth exceeded {0}")]
    StackOverflow(usize),

    #[error("FieldError: field {0} not found in {1}")]
    FieldError(String, String),
}

impl RuntimeError {
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        RuntimeError::TypeError(msg.into())
    }

    pub fn undefined_function<S: Into<String>>(name: S) -> Self {
        RuntimeError::UndefinedFunction(name.into())
    }

    pub fn unknown_module<S: Into<String>>(name: S) -> Self {
        RuntimeError::UnknownModule(name.into())
    }

    pub fn field_error<S1: Into<String>, S2: Into<String>>(field: S1, type_name: S2) -> Self {
        RuntimeError::FieldError(field.into(), type_name.into())
    }

    pub fn overflow<S: Into<String>>(msg: S) -> Self {
        RuntimeError::Overflow(msg.into())
    }

    /// True for the two failures a compiled function raises on purpose.
    pub fn is_fatal_dispatch_failure(&self) -> bool {
        matches!(
            self,
            RuntimeError::ValidationAbort { .. } | RuntimeError::NoClauseMatch { .. }
        )
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::ValidationAbort {
            name: "count".to_string(),
            value: Value::Int(-1),
            diagnostic: "must be greater than or equal to 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ValidationError: validation error for count: must be greater than or equal to 0 (got -1)"
        );

        let err = RuntimeError::NoClauseMatch {
            function: "Main.f/2".to_string(),
            args: vec![Value::Int(1), Value::text("x")],
        };
        assert_eq!(
            err.to_string(),
            r#"NoClauseMatch: no clause of Main.f/2 matches (1, "x")"#
        );

        assert_eq!(
            RuntimeError::DivisionByZero.to_string(),
            "DivideError: division by zero"
        );
    }

    #[test]
    fn test_fatal_classification() {
        let err = RuntimeError::NoClauseMatch {
            function: "f".to_string(),
            args: vec![],
        };
        assert!(err.is_fatal_dispatch_failure());
        assert!(!RuntimeError::type_error("x").is_fatal_dispatch_failure());
    }
}
