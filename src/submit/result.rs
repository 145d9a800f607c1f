//! Submission outcomes and field errors

use serde::{Deserialize, Serialize};

/// Why a single field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    TooShort { min: usize },
    Mismatch,
}

/// A validation failure attributed to one named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }

    /// Text shown next to the field
    pub fn message(&self) -> String {
        match &self.kind {
            FieldErrorKind::Required => "This field is required.".to_string(),
            FieldErrorKind::InvalidEmail => "Please enter a valid email address.".to_string(),
            FieldErrorKind::TooShort { min } => {
                format!("Password must be at least {min} characters.")
            }
            FieldErrorKind::Mismatch => "Passwords do not match.".to_string(),
        }
    }
}

/// Outcome of one submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { redirect_target: String },
    ValidationFailure { field_errors: Vec<FieldError> },
    SimulatedRemoteFailure { reason: String },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailure { field_errors } => field_errors,
            _ => &[],
        }
    }
}
