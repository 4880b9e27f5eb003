//! Error values and the host-facing error type.
//!
//! Inside the engine an error is a value (`Value::Error`) plus the `error`
//! or `failure` flag. [`EvalError`] is what a host gets back from a
//! top-level run that ended with `error` set.

use std::fmt;

/// Error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A reference could not be bound through the chain nor through
    /// receiver-qualified dispatch.
    UnresolvedReference,
    /// A native operation rejected one of its arguments.
    Argument,
    /// A guard marker or error value appeared where an expression was
    /// expected, or the tape ended inside an expression.
    Structural,
    /// A native operation reported a recoverable failure.
    Failure,
    /// Call nesting exceeded the configured limit.
    Recursion,
    /// Anything raised by user code or an integration module.
    Custom,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::UnresolvedReference => "unresolved reference",
            ErrorKind::Argument => "argument error",
            ErrorKind::Structural => "structural error",
            ErrorKind::Failure => "failure",
            ErrorKind::Recursion => "recursion limit",
            ErrorKind::Custom => "error",
        })
    }
}

/// Error object carried by `Value::Error`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorValue {
    kind: ErrorKind,
    message: String,
    status: Option<i64>,
}

impl ErrorValue {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorValue {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Attach a numeric status code (e.g. an HTTP status or exit code).
    #[must_use]
    pub fn with_status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<i64> {
        self.status
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(status) = self.status {
            write!(f, " ({status})")?;
        }
        Ok(())
    }
}

/// An unhandled error at the top of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<i64>,
}

impl From<&ErrorValue> for EvalError {
    fn from(e: &ErrorValue) -> Self {
        EvalError {
            kind: e.kind,
            message: e.message.clone(),
            status: e.status,
        }
    }
}

/// Rejected native registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("native operation `{name}` declares arity {arity}, maximum is 5")]
    Arity { name: &'static str, arity: usize },
    #[error("native operation name must not be empty")]
    EmptyName,
}

/// Rejected binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("symbol is already bound in this context")]
    AlreadyBound,
}

// Factory functions for the errors the evaluator raises

pub fn unresolved_reference(name: &str) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::UnresolvedReference,
        format!("word not found: {name}"),
    )
}

pub fn already_bound(name: &str) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Structural,
        format!("can't set already set word {name}, try using modword (::)"),
    )
}

pub fn expression_guard() -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Structural,
        "expression guard inside expression",
    )
}

pub fn error_object_encountered(inner: &ErrorValue) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Structural,
        format!("error object encountered: {inner}"),
    )
}

pub fn missing_value() -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Structural,
        "expected a value but the tape ended",
    )
}

pub fn missing_left_value(name: &str) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Structural,
        format!("operator reference {name} has no left-hand value"),
    )
}

pub fn path_not_context(segment: &str) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::UnresolvedReference,
        format!("path segment {segment} is not a context"),
    )
}

pub fn recursion_limit_exceeded(max: usize) -> ErrorValue {
    ErrorValue::new(
        ErrorKind::Recursion,
        format!("maximum call depth of {max} exceeded"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_value_display() {
        let e = ErrorValue::new(ErrorKind::Failure, "disk unavailable").with_status(503);
        assert_eq!(e.to_string(), "failure: disk unavailable (503)");
        assert_eq!(e.status(), Some(503));
    }

    #[test]
    fn test_eval_error_from_value() {
        let e = unresolved_reference("foo");
        let err = EvalError::from(&e);
        assert_eq!(err.kind, ErrorKind::UnresolvedReference);
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_registration_error_message() {
        let err = RegistrationError::Arity {
            name: "too-many",
            arity: 6,
        };
        assert_eq!(
            err.to_string(),
            "native operation `too-many` declares arity 6, maximum is 5"
        );
    }
}
