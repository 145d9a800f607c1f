//! Synchronous, per-keystroke validation
//!
//! Pure functions only: nothing here touches state or the presentation layer.

mod strength;
mod validator;

pub use strength::{RuleCheck, StrengthLabel, StrengthReport, StrengthRule, StrengthScorer};
pub use validator::{
    fields_match, match_status, validate_email, validate_password_length, MatchStatus,
};
