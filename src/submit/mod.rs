//! Submission orchestration and the simulated remote authority

mod orchestrator;
mod remote;
mod result;

pub use orchestrator::{
    notify_invalid, validate_fields, Submission, SubmissionOrchestrator, SubmitPolicy,
    INVALID_FORM_MESSAGE,
};
pub use remote::{
    Granted, RemoteAuthority, RemoteFailure, SimulatedAuthority, SubmitRequest,
    ALREADY_REGISTERED, INVALID_CREDENTIALS,
};
pub use result::{FieldError, FieldErrorKind, SubmissionResult};

#[cfg(test)]
pub use remote::MockRemoteAuthority;
