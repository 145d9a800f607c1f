//! Form domain layer
//!
//! Typed form state: fields, the login and signup forms, and the enum that
//! tracks which one is active.

mod field;
mod form_state;

pub use field::{FieldKind, FieldValue, FormField};
pub use form_state::{FlowKind, Form, FormState, LoginForm, SignupForm};
