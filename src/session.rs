//! Form session: the event-driven core behind the login and signup screens
//!
//! A session owns every piece of typed state for one interaction: the
//! active form, its step position, the username prober and the latest
//! field errors. UI events come in as method calls; everything visible goes
//! out through the [`PresentationGateway`].

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::gateway::{Cue, PresentationGateway};
use crate::probe::{AvailabilityProber, UsernameDirectory};
use crate::state::{
    AvailabilityStatus, FlowKind, Form, FormField, FormState, StepController, StepState,
    StepTransition,
};
use crate::storage::KeyValueStore;
use crate::submit::{
    notify_invalid, validate_fields, FieldError, RemoteAuthority, Submission,
    SubmissionOrchestrator, SubmissionResult, SubmitPolicy,
};
use crate::validation::{match_status, MatchStatus, StrengthReport, StrengthScorer};

const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";
const CONFIRM_FIELD: &str = "confirm_password";

/// Live feedback computed after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFeedback {
    pub field: String,
    /// Strength meter, present when the main password changed
    pub strength: Option<StrengthReport>,
    /// Confirmation indicator, present when either signup password changed
    pub match_status: Option<MatchStatus>,
}

/// Collaborators a session talks to
#[derive(Clone)]
pub struct SessionPorts {
    pub gateway: Arc<dyn PresentationGateway>,
    pub directory: Arc<dyn UsernameDirectory>,
    pub authority: Arc<dyn RemoteAuthority>,
    pub store: Arc<dyn KeyValueStore>,
}

/// Errors that block leaving every step before `step`
fn gate_errors<F: Submission>(
    form: &F,
    step: usize,
    password_min_length: usize,
) -> Vec<FieldError> {
    let mut errors = validate_fields(form.fields_before_step(step), password_min_length);
    errors.extend(form.cross_field_errors().into_iter().filter(|error| {
        form.field_index(&error.field)
            .is_some_and(|index| form.step_of(index) < step)
    }));
    errors
}

pub struct FormSession {
    id: Uuid,
    form: FormState,
    steps: StepController,
    prober: AvailabilityProber,
    orchestrator: SubmissionOrchestrator,
    gateway: Arc<dyn PresentationGateway>,
    scorer: StrengthScorer,
    field_errors: Vec<FieldError>,
}

impl FormSession {
    /// Start a session showing the `kind` form
    pub fn new(
        config: &FlowConfig,
        kind: FlowKind,
        ports: SessionPorts,
    ) -> Result<Self, FlowError> {
        let form = FormState::new(kind);
        let steps = StepController::new(form.as_form().step_count())?;
        let prober = AvailabilityProber::new(
            ports.directory,
            Arc::clone(&ports.gateway),
            config.debounce(),
            config.min_identifier_len(),
        );
        let orchestrator = SubmissionOrchestrator::new(
            ports.authority,
            ports.store,
            Arc::clone(&ports.gateway),
            SubmitPolicy::from_config(config),
        );

        let id = Uuid::new_v4();
        tracing::info!(session = %id, flow = kind.label(), "Form session started");

        Ok(Self {
            id,
            form,
            steps,
            prober,
            orchestrator,
            gateway: ports.gateway,
            scorer: StrengthScorer::new(config.strength_min_length()),
            field_errors: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> FlowKind {
        self.form.kind()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn step_state(&self) -> StepState {
        self.steps.state()
    }

    pub fn progress(&self) -> f32 {
        self.steps.progress()
    }

    /// Errors from the last refused step change or submit
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        self.field_errors
            .iter()
            .filter(|error| error.field == field)
            .collect()
    }

    pub fn availability(&self) -> AvailabilityStatus {
        self.prober.status()
    }

    pub fn subscribe_availability(&self) -> watch::Receiver<AvailabilityStatus> {
        self.prober.subscribe()
    }

    fn field_mut(&mut self, field: &str) -> Result<&mut FormField, FlowError> {
        let form: &mut dyn Form = self.form.as_form_mut();
        form.field_by_name_mut(field)
            .ok_or_else(|| FlowError::UnknownField(field.to_string()))
    }

    /// Switch between the login and signup tabs
    ///
    /// The other form starts fresh; switching to the tab already shown does
    /// nothing.
    pub fn switch_tab(&mut self, kind: FlowKind) -> Result<(), FlowError> {
        if self.kind() == kind {
            return Ok(());
        }

        let form = FormState::new(kind);
        self.steps = StepController::new(form.as_form().step_count())?;
        self.form = form;
        self.prober.reset();
        self.field_errors.clear();

        self.gateway.play_cue(Cue::Hover);
        self.gateway.replay_entrance_animation(1);
        tracing::info!(session = %self.id, flow = kind.label(), "Switched tab");
        Ok(())
    }

    pub fn next_field(&mut self) {
        self.form.next_field();
    }

    pub fn prev_field(&mut self) {
        self.form.prev_field();
    }

    /// Replace the value of a text field; checkboxes refuse text
    pub fn set_text(&mut self, field: &str, value: &str) -> Result<FieldFeedback, FlowError> {
        if !self.field_mut(field)?.set_text(value) {
            return Err(FlowError::WrongFieldKind(field.to_string()));
        }
        Ok(self.after_edit(field))
    }

    /// Tick or untick a checkbox
    pub fn set_checked(&mut self, field: &str, checked: bool) -> Result<FieldFeedback, FlowError> {
        if !self.field_mut(field)?.set_checked(checked) {
            return Err(FlowError::WrongFieldKind(field.to_string()));
        }
        Ok(self.after_edit(field))
    }

    /// Type one character into the focused field
    pub fn type_char(&mut self, c: char) -> FieldFeedback {
        let field = self.form.get_active_field_mut();
        field.push_char(c);
        let name = field.name.clone();
        self.after_edit(&name)
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) -> FieldFeedback {
        let field = self.form.get_active_field_mut();
        field.pop_char();
        let name = field.name.clone();
        self.after_edit(&name)
    }

    /// Show or hide a password field; returns whether it is now masked
    pub fn toggle_visibility(&mut self, field: &str) -> Result<bool, FlowError> {
        let masked = self.field_mut(field)?.toggle_visibility();
        self.gateway.play_cue(Cue::Click);
        Ok(masked)
    }

    /// Strength of the current password, evaluated fresh
    pub fn strength(&self) -> Option<StrengthReport> {
        let password = self.form.as_form().field_by_name(PASSWORD_FIELD)?;
        Some(self.scorer.evaluate(password.as_text()))
    }

    /// Confirmation indicator; only the signup form has one
    pub fn match_status(&self) -> Option<MatchStatus> {
        match &self.form {
            FormState::Signup(form) => Some(match_status(
                form.password.as_text(),
                form.confirm_password.as_text(),
            )),
            _ => None,
        }
    }

    fn after_edit(&mut self, field: &str) -> FieldFeedback {
        self.field_errors.retain(|error| error.field != field);
        tracing::debug!(session = %self.id, field, "Field edited");

        if let FormState::Signup(form) = &self.form {
            if field == USERNAME_FIELD {
                let username = form.username.as_text().to_string();
                self.prober.input(&username);
            }
        }

        let strength = (field == PASSWORD_FIELD)
            .then(|| self.strength())
            .flatten();
        let match_status = matches!(field, PASSWORD_FIELD | CONFIRM_FIELD)
            .then(|| self.match_status())
            .flatten();

        FieldFeedback {
            field: field.to_string(),
            strength,
            match_status,
        }
    }

    fn gate_errors(&self, step: usize) -> Vec<FieldError> {
        let min = self.orchestrator.policy().password_min_length;
        match &self.form {
            FormState::Login(form) => gate_errors(form, step, min),
            FormState::Signup(form) => gate_errors(form, step, min),
        }
    }

    /// Jump to `step`
    ///
    /// Moving forward requires every field on the steps being left behind
    /// to be valid. Moving back is always allowed.
    pub fn go_to_step(&mut self, step: usize) -> Result<StepTransition, FlowError> {
        let state = self.steps.state();
        if step > state.current() && step <= state.total() {
            let errors = self.gate_errors(step);
            if !errors.is_empty() {
                tracing::info!(
                    session = %self.id,
                    step,
                    errors = errors.len(),
                    "Step change blocked"
                );
                notify_invalid(self.gateway.as_ref(), &errors);
                self.field_errors = errors;
                return Err(FlowError::StepBlocked(step));
            }
        }

        let transition = self.steps.go_to(step)?;
        self.gateway.replay_entrance_animation(transition.to);
        self.gateway.play_cue(Cue::Click);
        tracing::info!(
            session = %self.id,
            from = transition.from,
            to = transition.to,
            "Moved to step"
        );
        Ok(transition)
    }

    /// Submit the active form; only allowed from the final step
    pub async fn submit(&mut self) -> Result<SubmissionResult, FlowError> {
        let state = self.steps.state();
        if !state.is_last() {
            return Err(FlowError::NotFinalStep(state.current()));
        }

        let result = match &self.form {
            FormState::Login(form) => self.orchestrator.submit(form).await,
            FormState::Signup(form) => self.orchestrator.submit(form).await,
        };

        match &result {
            SubmissionResult::ValidationFailure { field_errors } => {
                self.field_errors = field_errors.clone();
            }
            SubmissionResult::Success { .. } => {
                // The interaction is over; start clean for the next one
                self.form = FormState::new(self.kind());
                self.steps.reset();
                self.prober.reset();
                self.field_errors.clear();
            }
            SubmissionResult::SimulatedRemoteFailure { .. } => {}
        }
        Ok(result)
    }
}
