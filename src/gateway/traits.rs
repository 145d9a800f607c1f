//! Trait abstraction for the presentation layer to enable mocking in tests

use serde::{Deserialize, Serialize};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Short audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Hover,
    Click,
    Success,
}

/// Control that shows a busy indicator while a submission is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyControl {
    LoginButton,
    SignupButton,
}

/// Everything the workflow asks the presentation layer to do
///
/// Calls are fire-and-forget; implementations must not block.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationGateway: Send + Sync {
    /// Show a transient notification
    fn notify(&self, message: &str, severity: Severity);

    /// Play a short audio cue
    fn play_cue(&self, cue: Cue);

    /// Navigate away from the form
    fn redirect(&self, target: &str);

    /// Put a control into its busy state
    fn show_busy(&self, control: BusyControl);

    /// Return a control to its idle state
    fn clear_busy(&self, control: BusyControl);

    /// Replay the entrance animation of a step (or of a whole form, step 1)
    fn replay_entrance_animation(&self, step: usize);
}
