//! Error types for the form workflow
//!
//! Field-level validation problems are values ([`crate::submit::FieldError`]),
//! not errors. The types here cover the few operations that can genuinely
//! refuse a request.

use thiserror::Error;

/// Errors raised by the step controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step {requested} is outside 1..={total}")]
    OutOfRange { requested: usize, total: usize },

    #[error("a form needs at least one step")]
    NoSteps,
}

/// Errors raised by key-value storage adapters
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by a form session
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Step(#[from] StepError),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} does not accept that kind of value")]
    WrongFieldKind(String),

    #[error("step {0} is blocked by invalid fields")]
    StepBlocked(usize),

    #[error("submit is only available on the final step (currently on step {0})")]
    NotFinalStep(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_display() {
        let err = StepError::OutOfRange {
            requested: 5,
            total: 4,
        };
        assert_eq!(err.to_string(), "step 5 is outside 1..=4");
    }

    #[test]
    fn test_flow_error_wraps_step_error() {
        let err: FlowError = StepError::NoSteps.into();
        assert!(matches!(err, FlowError::Step(StepError::NoSteps)));
        assert_eq!(err.to_string(), "a form needs at least one step");
    }

    #[test]
    fn test_storage_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(err.to_string().starts_with("stored value is not valid JSON"));
    }
}
