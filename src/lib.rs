//! Access Flow - headless login/signup form workflow
//!
//! Field validation, password strength scoring, multi-step navigation,
//! debounced username availability checks and a simulated staged
//! submission. Rendering is left to whoever implements
//! [`gateway::PresentationGateway`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod probe;
pub mod session;
pub mod state;
pub mod storage;
pub mod submit;
pub mod validation;

pub use config::FlowConfig;
pub use error::{FlowError, StepError, StorageError};
pub use session::{FieldFeedback, FormSession, SessionPorts};
pub use submit::SubmissionResult;
